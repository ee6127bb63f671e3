// Size literal parsing for partition sizes, serials and flash offsets

use crate::EspFatError;
use log::debug;

/// Parse a byte count given as a decimal or `0x`-prefixed hexadecimal literal.
///
/// Partition tables list sizes in hex (`0xBF0000`) while people tend to type
/// decimal, so both are accepted. Range checking is left to the caller.
pub fn parse_size(input: &str) -> Result<u64, EspFatError> {
    let trimmed = input.trim();

    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };

    let value = parsed.map_err(|_| EspFatError::InvalidSizeFormat(trimmed.to_string()))?;
    debug!("Parsed size literal {:?} as {} bytes", trimmed, value);
    Ok(value)
}

/// Same as [`parse_size`] but for values that must fit in 32 bits.
pub fn parse_u32(input: &str) -> Result<u32, EspFatError> {
    let value = parse_size(input)?;
    u32::try_from(value).map_err(|_| {
        EspFatError::InvalidInput(format!("{} does not fit in 32 bits", input.trim()))
    })
}
