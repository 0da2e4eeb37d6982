//! Operation result classifier.
//!
//! A [`StatusCode`] is a 32-bit value whose top two bits carry the severity
//! (00 good, 01 uncertain, 10 bad). Every per-item result produced by the
//! service layer carries exactly one status code.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(u32);

macro_rules! status_codes {
    ($($name:ident = $value:literal, $symbol:literal;)*) => {
        impl StatusCode {
            $(pub const $name: StatusCode = StatusCode($value);)*

            /// Symbolic protocol name of this code, if it is one we know.
            pub fn name(&self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some($symbol),)*
                    _ => None,
                }
            }
        }
    };
}

status_codes! {
    GOOD = 0x0000_0000, "Good";
    GOOD_NO_DATA = 0x00A5_0000, "Good_NoData";
    UNCERTAIN = 0x4000_0000, "Uncertain";
    BAD_INTERNAL_ERROR = 0x8002_0000, "Bad_InternalError";
    BAD_USER_ACCESS_DENIED = 0x801F_0000, "Bad_UserAccessDenied";
    BAD_NODE_ID_UNKNOWN = 0x8034_0000, "Bad_NodeIdUnknown";
    BAD_ATTRIBUTE_ID_INVALID = 0x8035_0000, "Bad_AttributeIdInvalid";
    BAD_INDEX_RANGE_INVALID = 0x8036_0000, "Bad_IndexRangeInvalid";
    BAD_INDEX_RANGE_NO_DATA = 0x8037_0000, "Bad_IndexRangeNoData";
    BAD_DATA_ENCODING_INVALID = 0x8038_0000, "Bad_DataEncodingInvalid";
    BAD_DATA_ENCODING_UNSUPPORTED = 0x8039_0000, "Bad_DataEncodingUnsupported";
    BAD_NOT_READABLE = 0x803A_0000, "Bad_NotReadable";
    BAD_NOT_WRITABLE = 0x803B_0000, "Bad_NotWritable";
    BAD_HISTORY_OPERATION_UNSUPPORTED = 0x8072_0000, "Bad_HistoryOperationUnsupported";
    BAD_TYPE_MISMATCH = 0x8074_0000, "Bad_TypeMismatch";
    BAD_METHOD_INVALID = 0x8075_0000, "Bad_MethodInvalid";
    BAD_ARGUMENTS_MISSING = 0x8076_0000, "Bad_ArgumentsMissing";
    BAD_NOT_EXECUTABLE = 0x8111_0000, "Bad_NotExecutable";
    BAD_TOO_MANY_ARGUMENTS = 0x80E5_0000, "Bad_TooManyArguments";
    BAD_INVALID_ARGUMENT = 0x80AB_0000, "Bad_InvalidArgument";
    BAD_OUT_OF_RANGE = 0x803C_0000, "Bad_OutOfRange";
}

impl StatusCode {
    const SEVERITY_MASK: u32 = 0xC000_0000;

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_good(&self) -> bool {
        self.0 & Self::SEVERITY_MASK == 0
    }

    pub fn is_uncertain(&self) -> bool {
        self.0 & Self::SEVERITY_MASK == 0x4000_0000
    }

    pub fn is_bad(&self) -> bool {
        self.0 & Self::SEVERITY_MASK == 0x8000_0000
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::GOOD
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "StatusCode({name})"),
            None => write!(f, "StatusCode({:#010X})", self.0),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#010X}", self.0),
        }
    }
}
