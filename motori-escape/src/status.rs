use bitflags::bitflags;

bitflags! {
    /// Extended status byte reported by `ESC . O`.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExtendedStatus : u8 {
        /// Receive buffer holds no data.
        const BUFFER_EMPTY = 0b0000_1000;
        /// Plotter is on line and accepts graphics.
        const READY        = 0b0001_0000;
    }
}
