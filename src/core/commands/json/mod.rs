// src/core/commands/json/mod.rs
//! Request builders and reply decoders for the `JSON.*` command family.

pub mod json_arrappend;
pub mod json_arrlen;
pub mod json_del;
pub mod json_get;
pub mod json_mget;
pub mod json_set;
pub mod json_type;

pub use self::json_arrappend::JsonArrAppend;
pub use self::json_arrlen::JsonArrLen;
pub use self::json_del::JsonDel;
pub use self::json_get::JsonGet;
pub use self::json_mget::JsonMGet;
pub use self::json_set::{JsonSet, SetCondition};
pub use self::json_type::{JsonType, JsonValueType};
