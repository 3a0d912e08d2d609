use std::io::{self, Read};

use motori_scan::{Scan, Scanner};

fn main() -> io::Result<()> {
    let mut input = Vec::new();
    match std::env::args().nth(1) {
        Some(arg) => input.extend_from_slice(arg.as_bytes()),
        None => {
            io::stdin().read_to_end(&mut input)?;
        },
    }

    let mut scanner = Scanner::new();
    let mut label = Vec::new();
    for byte in input {
        match scanner.advance(byte) {
            Scan::Continue => {},
            Scan::Command(command) => {
                println!("{}: {:?}", command.mnemonic, command.params.as_slice());
            },
            Scan::LabelStart => label.clear(),
            Scan::Label(byte) => label.push(byte),
            Scan::LabelEnd => {
                println!("LB: {:?}", String::from_utf8_lossy(&label));
            },
            Scan::Error(err) => println!("error: {err}"),
        }
    }

    Ok(())
}
