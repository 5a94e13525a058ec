//! Parser combinators for netlink wire structures.

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take;
use zerocopy::FromBytes;

use super::error::{Error, Result};

/// Result type for winnow parsers.
pub type PResult<T> = core::result::Result<T, ErrMode<ContextError>>;

/// Parse a fixed-size kernel structure and advance past it.
///
/// Fails if fewer than `size_of::<T>()` bytes remain.
pub fn parse_struct<T: FromBytes>(input: &mut &[u8]) -> PResult<T> {
    let bytes: &[u8] = take(std::mem::size_of::<T>()).parse_next(input)?;
    T::read_from_bytes(bytes).map_err(|_| ErrMode::Cut(ContextError::new()))
}

/// Run a parser over a complete buffer prefix, returning the rest.
pub fn parse_prefix<'a, T>(
    data: &'a [u8],
    parser: impl FnOnce(&mut &'a [u8]) -> PResult<T>,
    what: &str,
) -> Result<(T, &'a [u8])> {
    let mut input = data;
    let value = parser(&mut input)
        .map_err(|e| Error::Parse(format!("{}: {:?} ({} bytes)", what, e, data.len())))?;
    Ok((value, input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::types::tc::TcMsg;

    #[test]
    fn test_parse_struct_advances() {
        let msg = TcMsg::new().with_parent(0xffff_ffff);
        let mut data = msg.as_bytes().to_vec();
        data.extend_from_slice(&[1, 2, 3]);

        let (parsed, rest) = parse_prefix(&data, parse_struct::<TcMsg>, "tcmsg").unwrap();
        assert_eq!(parsed.tcm_parent, 0xffff_ffff);
        assert_eq!(rest, &[1, 2, 3]);
    }

    #[test]
    fn test_parse_struct_short() {
        let err = parse_prefix(&[0u8; 10], parse_struct::<TcMsg>, "tcmsg").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
