//! The operation catalogue.
//!
//! An [`Operation`] is a request as it arrives from a caller: raw numbers,
//! possibly out of range. [`Operation::validate`] turns it into a [`Filter`]
//! whose parameters are known-good, and [`Filter::apply`] runs the matching
//! function from the [`filters`](super::filters) library.
//!
//! | Operation | Parameters | Valid range |
//! |---|---|---|
//! | grayscale | - | - |
//! | blur | intensity | 1–50 |
//! | edges | - | - |
//! | brightness | delta | -100–100 |
//! | contrast | factor | 0.5–3.0 |
//! | rotate | degrees | 90, 180, 270 |
//! | flip | axis | horizontal, vertical |
//! | resize | width, height | both > 0 |
//!
//! Operations also have a compact text form used by the CLI and the shell:
//! `grayscale`, `blur 5`, `edges`, `brightness -20`, `contrast 1.5`,
//! `rotate 90`, `flip horizontal`, `resize 400 300` (`blur=5`, `resize=400x300`
//! are accepted too).

use super::filters;
use super::params::{
    BlurIntensity, Brightness, ContrastFactor, Dimensions, FlipAxis, InvalidParam, Rotation,
};
use image::DynamicImage;
use std::fmt;
use thiserror::Error;

/// A requested edit with unvalidated parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Grayscale,
    Blur { intensity: i64 },
    EdgeDetect,
    Brightness { delta: i64 },
    Contrast { factor: f64 },
    Rotate { degrees: i64 },
    Flip { axis: FlipAxis },
    Resize { width: i64, height: i64 },
}

/// An edit whose parameters passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    Grayscale,
    Blur(BlurIntensity),
    EdgeDetect,
    Brightness(Brightness),
    Contrast(ContrastFactor),
    Rotate(Rotation),
    Flip(FlipAxis),
    Resize(Dimensions),
}

impl Operation {
    /// Check parameters against the operation's domain.
    pub fn validate(&self) -> Result<Filter, InvalidParam> {
        Ok(match *self {
            Self::Grayscale => Filter::Grayscale,
            Self::Blur { intensity } => Filter::Blur(BlurIntensity::new(intensity)?),
            Self::EdgeDetect => Filter::EdgeDetect,
            Self::Brightness { delta } => Filter::Brightness(Brightness::new(delta)?),
            Self::Contrast { factor } => Filter::Contrast(ContrastFactor::new(factor)?),
            Self::Rotate { degrees } => Filter::Rotate(Rotation::from_degrees(degrees)?),
            Self::Flip { axis } => Filter::Flip(axis),
            Self::Resize { width, height } => Filter::Resize(Dimensions::new(width, height)?),
        })
    }

    /// Short name, as typed in the shell.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Blur { .. } => "blur",
            Self::EdgeDetect => "edges",
            Self::Brightness { .. } => "brightness",
            Self::Contrast { .. } => "contrast",
            Self::Rotate { .. } => "rotate",
            Self::Flip { .. } => "flip",
            Self::Resize { .. } => "resize",
        }
    }

    /// Parse the text form from already-split words.
    ///
    /// Returns `Ok(None)` when `name` is not an operation at all, so callers
    /// can try other command tables.
    pub fn from_words(name: &str, args: &[&str]) -> Result<Option<Self>, ParseOperationError> {
        let op = match name.to_ascii_lowercase().as_str() {
            "grayscale" | "greyscale" | "gray" => Self::Grayscale,
            "blur" => Self::Blur {
                intensity: int_arg(name, args, 0)?,
            },
            "edges" | "edge" | "edgedetect" => Self::EdgeDetect,
            "brightness" => Self::Brightness {
                delta: int_arg(name, args, 0)?,
            },
            "contrast" => Self::Contrast {
                factor: float_arg(name, args, 0)?,
            },
            "rotate" => Self::Rotate {
                degrees: int_arg(name, args, 0)?,
            },
            "flip" => {
                let raw = arg(name, args, 0)?;
                let axis = raw
                    .parse()
                    .map_err(|reason| ParseOperationError::BadArgument {
                        operation: name.to_string(),
                        reason,
                    })?;
                Self::Flip { axis }
            }
            "resize" => Self::Resize {
                width: int_arg(name, args, 0)?,
                height: int_arg(name, args, 1)?,
            },
            _ => return Ok(None),
        };
        Ok(Some(op))
    }
}

impl std::str::FromStr for Operation {
    type Err = ParseOperationError;

    /// Parse `"blur 5"`, `"blur=5"`, `"resize 400 300"` or `"resize=400x300"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replacen('=', " ", 1);
        let mut words: Vec<&str> = normalized.split_whitespace().collect();
        if words.is_empty() {
            return Err(ParseOperationError::Empty);
        }
        let name = words.remove(0);
        // `resize 400x300`
        let split_size: Vec<&str>;
        let args: &[&str] = if name.eq_ignore_ascii_case("resize") && words.len() == 1 {
            split_size = words[0].splitn(2, 'x').collect();
            &split_size
        } else {
            &words
        };
        Self::from_words(name, args)?.ok_or_else(|| ParseOperationError::Unknown(name.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grayscale | Self::EdgeDetect => f.write_str(self.name()),
            Self::Blur { intensity } => write!(f, "blur {intensity}"),
            Self::Brightness { delta } => write!(f, "brightness {delta}"),
            Self::Contrast { factor } => write!(f, "contrast {factor}"),
            Self::Rotate { degrees } => write!(f, "rotate {degrees}"),
            Self::Flip { axis } => write!(f, "flip {axis}"),
            Self::Resize { width, height } => write!(f, "resize {width} {height}"),
        }
    }
}

impl Filter {
    /// Run the filter. Never mutates `image`.
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match *self {
            Self::Grayscale => filters::grayscale(image),
            Self::Blur(intensity) => filters::blur(image, intensity),
            Self::EdgeDetect => filters::edge_detect(image),
            Self::Brightness(delta) => filters::brightness(image, delta),
            Self::Contrast(factor) => filters::contrast(image, factor),
            Self::Rotate(rotation) => filters::rotate(image, rotation),
            Self::Flip(axis) => filters::flip(image, axis),
            Self::Resize(size) => filters::resize(image, size),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseOperationError {
    #[error("empty operation")]
    Empty,
    #[error("unknown operation: {0}")]
    Unknown(String),
    #[error("{operation}: missing argument #{position}")]
    MissingArgument { operation: String, position: usize },
    #[error("{operation}: {reason}")]
    BadArgument { operation: String, reason: String },
}

fn arg<'a>(op: &str, args: &[&'a str], position: usize) -> Result<&'a str, ParseOperationError> {
    args.get(position)
        .copied()
        .ok_or_else(|| ParseOperationError::MissingArgument {
            operation: op.to_string(),
            position: position + 1,
        })
}

fn int_arg(op: &str, args: &[&str], position: usize) -> Result<i64, ParseOperationError> {
    let raw = arg(op, args, position)?;
    raw.parse().map_err(|_| ParseOperationError::BadArgument {
        operation: op.to_string(),
        reason: format!("expected an integer, got {raw:?}"),
    })
}

fn float_arg(op: &str, args: &[&str], position: usize) -> Result<f64, ParseOperationError> {
    let raw = arg(op, args, position)?;
    raw.parse().map_err(|_| ParseOperationError::BadArgument {
        operation: op.to_string(),
        reason: format!("expected a number, got {raw:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn validate_accepts_catalogue_bounds() {
        let ok = [
            Operation::Grayscale,
            Operation::Blur { intensity: 1 },
            Operation::Blur { intensity: 50 },
            Operation::EdgeDetect,
            Operation::Brightness { delta: -100 },
            Operation::Contrast { factor: 3.0 },
            Operation::Rotate { degrees: 180 },
            Operation::Flip {
                axis: FlipAxis::Vertical,
            },
            Operation::Resize {
                width: 1,
                height: 1,
            },
        ];
        for op in ok {
            assert!(op.validate().is_ok(), "{op} should validate");
        }
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let bad = [
            Operation::Blur { intensity: 0 },
            Operation::Blur { intensity: 51 },
            Operation::Brightness { delta: 101 },
            Operation::Contrast { factor: 0.1 },
            Operation::Rotate { degrees: 45 },
            Operation::Resize {
                width: -1,
                height: 10,
            },
            Operation::Resize {
                width: 10,
                height: 0,
            },
        ];
        for op in bad {
            assert!(op.validate().is_err(), "{op} should be rejected");
        }
    }

    #[test]
    fn parse_space_and_equals_forms() {
        assert_eq!("blur 5".parse::<Operation>(), Ok(Operation::Blur { intensity: 5 }));
        assert_eq!("blur=5".parse::<Operation>(), Ok(Operation::Blur { intensity: 5 }));
        assert_eq!(
            "brightness -20".parse::<Operation>(),
            Ok(Operation::Brightness { delta: -20 })
        );
        assert_eq!(
            "contrast=1.5".parse::<Operation>(),
            Ok(Operation::Contrast { factor: 1.5 })
        );
        assert_eq!("GRAYSCALE".parse::<Operation>(), Ok(Operation::Grayscale));
        assert_eq!("edges".parse::<Operation>(), Ok(Operation::EdgeDetect));
    }

    #[test]
    fn parse_resize_forms() {
        let expected = Ok(Operation::Resize {
            width: 400,
            height: 300,
        });
        assert_eq!("resize 400 300".parse::<Operation>(), expected);
        assert_eq!("resize=400x300".parse::<Operation>(), expected);
        assert_eq!("resize 400x300".parse::<Operation>(), expected);
    }

    #[test]
    fn parse_flip_axis() {
        assert_eq!(
            "flip vertical".parse::<Operation>(),
            Ok(Operation::Flip {
                axis: FlipAxis::Vertical
            })
        );
        assert!(matches!(
            "flip diagonal".parse::<Operation>(),
            Err(ParseOperationError::BadArgument { .. })
        ));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Operation>(), Err(ParseOperationError::Empty));
        assert_eq!(
            "sharpen 3".parse::<Operation>(),
            Err(ParseOperationError::Unknown("sharpen".into()))
        );
        assert!(matches!(
            "blur".parse::<Operation>(),
            Err(ParseOperationError::MissingArgument { position: 1, .. })
        ));
        assert!(matches!(
            "blur soft".parse::<Operation>(),
            Err(ParseOperationError::BadArgument { .. })
        ));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let op = Operation::Resize {
            width: 640,
            height: 480,
        };
        assert_eq!(op.to_string().parse::<Operation>(), Ok(op));
    }

    #[test]
    fn filter_apply_resizes() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(200, 100));
        let filter = Operation::Resize {
            width: 400,
            height: 300,
        }
        .validate()
        .unwrap();
        let out = filter.apply(&img);
        assert_eq!((out.width(), out.height()), (400, 300));
    }
}
