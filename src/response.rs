//! Backward-frame interpretation: turns a possibly-absent, possibly-framing-
//! errored backward byte into the typed [`Response`] a query command declares.

use crate::frame::{Backward, Frame};

/// Declares which parser a query command's backward frame should go through.
#[derive(Debug, Clone, Copy)]
pub enum ResponseKind {
    Numeric,
    NumericMask,
    YesNo,
    /// Like `YesNo`, but a collision is reported as `FramingError` instead of
    /// folded into "yes". `Compare` is the one command where the commissioning
    /// sequence must tell "one gear said yes" apart from "two gears answered
    /// at once".
    YesNoOrError,
    Bitmap(&'static [&'static str]),
    Enum(fn(u8) -> &'static str),
}

/// A bitmap response: a raw byte plus the names of its flag bits, most
/// significant bit first as declared by the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapResponse {
    pub raw: u8,
    pub flags: &'static [&'static str],
}

impl BitmapResponse {
    pub fn is_set(&self, index: usize) -> bool {
        self.flags
            .len()
            .checked_sub(index + 1)
            .map(|bit| self.raw & (1 << bit) != 0)
            .unwrap_or(false)
    }

    /// Names of every set flag, in declaration order.
    pub fn status(&self) -> Vec<&'static str> {
        self.flags
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_set(*i))
            .map(|(_, name)| *name)
            .collect()
    }
}

/// An enum-valued response: the raw byte plus its resolved name, or the
/// `"(error)"` sentinel when the byte does not correspond to a known member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumResponse {
    pub raw: u8,
    pub name: &'static str,
}

pub const ENUM_RESPONSE_ERROR: &str = "(error)";

/// A decoded backward frame, in the shape a query command's `response_type`
/// selected. `Numeric`/`NumericMask`/`Bitmap`/`Enum` carry `None` when no
/// backward frame arrived; `YesNo` collapses absence to `false`;
/// `FramingError` is reported on its own because a bus collision makes the
/// byte's value indeterminate (except for `YesNo`, where any frame at all —
/// clean or collided — means "yes").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Numeric(Option<u8>),
    NumericMask(Option<u8>),
    YesNo(bool),
    Bitmap(Option<BitmapResponse>),
    Enum(Option<EnumResponse>),
    FramingError,
}

impl Response {
    pub fn is_framing_error(&self) -> bool {
        matches!(self, Response::FramingError)
    }

    /// `true` when a `NumericMask` response's byte is `0xff` ("unknown").
    pub fn is_mask(&self) -> bool {
        matches!(self, Response::NumericMask(Some(0xff)))
    }
}

/// Produce the typed [`Response`] for a query whose backward frame (if any)
/// is `frame`.
pub fn parse_response(kind: ResponseKind, frame: Option<Frame<Backward>>) -> Response {
    match kind {
        ResponseKind::Numeric => match frame {
            None => Response::Numeric(None),
            Some(f) if f.is_error() => Response::FramingError,
            Some(f) => Response::Numeric(Some(f.as_integer() as u8)),
        },
        ResponseKind::NumericMask => match frame {
            None => Response::NumericMask(None),
            Some(f) if f.is_error() => Response::FramingError,
            Some(f) => Response::NumericMask(Some(f.as_integer() as u8)),
        },
        ResponseKind::YesNo => Response::YesNo(frame.is_some()),
        ResponseKind::YesNoOrError => match frame {
            None => Response::YesNo(false),
            Some(f) if f.is_error() => Response::FramingError,
            Some(_) => Response::YesNo(true),
        },
        ResponseKind::Bitmap(flags) => match frame {
            None => Response::Bitmap(None),
            Some(f) if f.is_error() => Response::FramingError,
            Some(f) => Response::Bitmap(Some(BitmapResponse { raw: f.as_integer() as u8, flags })),
        },
        ResponseKind::Enum(decode) => match frame {
            None => Response::Enum(None),
            Some(f) if f.is_error() => Response::FramingError,
            Some(f) => {
                let raw = f.as_integer() as u8;
                Response::Enum(Some(EnumResponse { raw, name: decode(raw) }))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_FLAGS: &[&str] = &[
        "status",
        "lamp failure",
        "arc power on",
        "limit error",
        "fade ready",
        "reset state",
        "missing short address",
        "power failure",
    ];

    #[test]
    fn numeric_missing_is_none() {
        assert_eq!(parse_response(ResponseKind::Numeric, None), Response::Numeric(None));
    }

    #[test]
    fn numeric_framing_error_is_indeterminate() {
        let f = Frame::<Backward>::with_error(8, 0).unwrap();
        assert_eq!(parse_response(ResponseKind::Numeric, Some(f)), Response::FramingError);
    }

    #[test]
    fn yes_no_treats_framing_error_as_yes() {
        let f = Frame::<Backward>::with_error(8, 0).unwrap();
        assert_eq!(parse_response(ResponseKind::YesNo, Some(f)), Response::YesNo(true));
        assert_eq!(parse_response(ResponseKind::YesNo, None), Response::YesNo(false));
    }

    #[test]
    fn yes_no_or_error_distinguishes_collision_from_yes() {
        let clean = Frame::<Backward>::new(8, 0xff).unwrap();
        let collided = Frame::<Backward>::with_error(8, 0xff).unwrap();
        assert_eq!(parse_response(ResponseKind::YesNoOrError, Some(clean)), Response::YesNo(true));
        assert_eq!(parse_response(ResponseKind::YesNoOrError, Some(collided)), Response::FramingError);
        assert_eq!(parse_response(ResponseKind::YesNoOrError, None), Response::YesNo(false));
    }

    #[test]
    fn bitmap_exposes_named_flags() {
        let f = Frame::<Backward>::new(8, 0b0000_0011).unwrap();
        let r = parse_response(ResponseKind::Bitmap(STATUS_FLAGS), Some(f));
        match r {
            Response::Bitmap(Some(bm)) => {
                assert!(bm.is_set(7));
                assert!(bm.is_set(6));
                assert!(!bm.is_set(0));
                assert_eq!(bm.status(), vec!["missing short address", "power failure"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn numeric_mask_surfaces_mask_byte() {
        let f = Frame::<Backward>::new(8, 0xff).unwrap();
        let r = parse_response(ResponseKind::NumericMask, Some(f));
        assert!(r.is_mask());
    }

    #[test]
    fn enum_unknown_value_is_error_sentinel() {
        fn decode(v: u8) -> &'static str {
            match v {
                0 => "instance",
                _ => ENUM_RESPONSE_ERROR,
            }
        }
        let f = Frame::<Backward>::new(8, 9).unwrap();
        match parse_response(ResponseKind::Enum(decode), Some(f)) {
            Response::Enum(Some(e)) => assert_eq!(e.name, ENUM_RESPONSE_ERROR),
            other => panic!("unexpected {other:?}"),
        }
    }
}
