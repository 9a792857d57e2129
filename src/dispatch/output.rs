//! Handler return values.
//!
//! A handler either produces a value for the response body or explicitly
//! produces nothing. [`IntoOutput`] converts common return types into that
//! tagged form.

use axum::body::Bytes;
use serde::Serialize;

use crate::dispatch::HandlerError;
use crate::http::response::TEXT_PLAIN;

/// Content type of JSON outputs.
pub const APPLICATION_JSON: &str = "application/json";

/// What a handler produced through its return channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// The handler produced no value; only the explicit response body is written.
    Nothing,
    /// Bytes to write as the body, with the content type they were rendered as.
    Value {
        body: Bytes,
        content_type: &'static str,
    },
}

impl Output {
    pub fn text(body: impl Into<String>) -> Self {
        Output::Value {
            body: Bytes::from(body.into()),
            content_type: TEXT_PLAIN,
        }
    }

    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HandlerError> {
        let body = serde_json::to_vec(value)?;
        Ok(Output::Value {
            body: Bytes::from(body),
            content_type: APPLICATION_JSON,
        })
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Output::Nothing)
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Output::Nothing => None,
            Output::Value { body, .. } => Some(body),
        }
    }
}

/// Conversion of handler return values into an [`Output`].
pub trait IntoOutput {
    fn into_output(self) -> Result<Output, HandlerError>;
}

impl IntoOutput for Output {
    fn into_output(self) -> Result<Output, HandlerError> {
        Ok(self)
    }
}

impl IntoOutput for () {
    fn into_output(self) -> Result<Output, HandlerError> {
        Ok(Output::Nothing)
    }
}

impl<T: IntoOutput> IntoOutput for Option<T> {
    fn into_output(self) -> Result<Output, HandlerError> {
        match self {
            Some(value) => value.into_output(),
            None => Ok(Output::Nothing),
        }
    }
}

impl IntoOutput for String {
    fn into_output(self) -> Result<Output, HandlerError> {
        Ok(Output::text(self))
    }
}

impl IntoOutput for &'static str {
    fn into_output(self) -> Result<Output, HandlerError> {
        Ok(Output::Value {
            body: Bytes::from_static(self.as_bytes()),
            content_type: TEXT_PLAIN,
        })
    }
}

impl IntoOutput for Bytes {
    fn into_output(self) -> Result<Output, HandlerError> {
        Ok(Output::Value {
            body: self,
            content_type: "application/octet-stream",
        })
    }
}

impl IntoOutput for Vec<u8> {
    fn into_output(self) -> Result<Output, HandlerError> {
        Bytes::from(self).into_output()
    }
}

impl IntoOutput for serde_json::Value {
    fn into_output(self) -> Result<Output, HandlerError> {
        Output::json(&self)
    }
}

macro_rules! display_output {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoOutput for $ty {
                fn into_output(self) -> Result<Output, HandlerError> {
                    Ok(Output::text(self.to_string()))
                }
            }
        )*
    };
}

display_output!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

/// Serialises the wrapped value as a JSON body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoOutput for Json<T> {
    fn into_output(self) -> Result<Output, HandlerError> {
        Output::json(&self.0)
    }
}
