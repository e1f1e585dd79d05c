//! Operation metadata surfaced to hosts and UIs.

use super::args::{ArgSpec, arg_specs};
use serde::Serialize;

/// Kinds of data an operation consumes, produces or presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    ByteArray,
    Html,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationInfo {
    pub name: &'static str,
    pub module: &'static str,
    pub description: &'static str,
    pub input_type: DataType,
    pub output_type: DataType,
    pub present_type: DataType,
    pub args: Vec<ArgSpec>,
}

impl OperationInfo {
    pub fn resize_image() -> Self {
        Self {
            name: "Resize Image",
            module: "Image",
            description: "Resize an image.",
            input_type: DataType::ByteArray,
            output_type: DataType::ByteArray,
            present_type: DataType::Html,
            args: arg_specs(),
        }
    }
}
