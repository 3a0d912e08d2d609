use crate::{Mnemonic, ScanError};

/// Upper bound of numeric parameters one instruction can carry.
pub const MAX_PARAMS: usize = 4;

const MAX_DIGITS: usize = 32;

/// Largest magnitude HP-GL accepts for a numeric parameter.
const MAX_MAGNITUDE: f32 = 8_388_607.0;

/// Numeric parameters of one instruction.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Params {
    items: [f32; MAX_PARAMS],
    len: usize,
}

impl Params {
    pub fn from_slice(values: &[f32]) -> Self {
        let mut params = Self::default();
        for value in values.iter().take(MAX_PARAMS) {
            params.push(*value);
        }
        params
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<f32> {
        self.as_slice().get(idx).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.items[..self.len]
    }

    /// Returns `false` when all slots are taken.
    pub(crate) fn push(&mut self, value: f32) -> bool {
        if self.len >= MAX_PARAMS {
            return false;
        }

        self.items[self.len] = value;
        self.len += 1;
        true
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
        self.items = [0.0; MAX_PARAMS];
    }
}

/// Scratchpad collecting the characters of the number being scanned.
#[derive(Debug, Default)]
pub(crate) struct Number {
    digits: [u8; MAX_DIGITS],
    len: usize,
    overflow: bool,
}

impl Number {
    pub(crate) fn collect(&mut self, byte: u8) {
        if self.len < MAX_DIGITS {
            self.digits[self.len] = byte;
            self.len += 1;
        } else {
            self.overflow = true;
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0 && !self.overflow
    }

    /// Parse and clear the scratchpad. `Ok(None)` means nothing was
    /// collected.
    pub(crate) fn take(
        &mut self,
        mnemonic: Mnemonic,
    ) -> Result<Option<f32>, ScanError> {
        if self.is_empty() {
            return Ok(None);
        }

        let parsed = if self.overflow {
            None
        } else {
            std::str::from_utf8(&self.digits[..self.len])
                .ok()
                .and_then(|text| text.parse::<f32>().ok())
                .filter(|value| value.abs() <= MAX_MAGNITUDE)
        };

        self.clear();
        parsed
            .map(Some)
            .ok_or(ScanError::BadNumberFormat(mnemonic))
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
        self.overflow = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> Result<Option<f32>, ScanError> {
        let mut number = Number::default();
        for byte in text.bytes() {
            number.collect(byte);
        }
        number.take(Mnemonic::PA)
    }

    #[test]
    fn parses_signed_and_fractional() {
        assert_eq!(number("-12.5"), Ok(Some(-12.5)));
        assert_eq!(number("+3"), Ok(Some(3.0)));
        assert_eq!(number(".25"), Ok(Some(0.25)));
        assert_eq!(number(""), Ok(None));
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert_eq!(number("1-2"), Err(ScanError::BadNumberFormat(Mnemonic::PA)));
        assert_eq!(number("-"), Err(ScanError::BadNumberFormat(Mnemonic::PA)));
        assert_eq!(
            number("99999999"),
            Err(ScanError::BadNumberFormat(Mnemonic::PA))
        );
    }

    #[test]
    fn too_many_digits_is_an_error() {
        let long = "1".repeat(MAX_DIGITS + 1);
        assert_eq!(number(&long), Err(ScanError::BadNumberFormat(Mnemonic::PA)));
    }

    #[test]
    fn params_stop_at_capacity() {
        let mut params = Params::default();
        for idx in 0..MAX_PARAMS {
            assert!(params.push(idx as f32));
        }
        assert!(!params.push(9.0));
        assert_eq!(params.as_slice(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(params.get(4), None);
    }
}
