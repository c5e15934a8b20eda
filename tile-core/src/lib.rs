//! Mô hình đầu ra cho ô hiển thị (tile) một Observation: tiêu đề và bảng thuộc tính.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cấu hình hiển thị cho tile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TileConfig {
    /// Độ lệch múi giờ (phút) dùng khi hiển thị thời điểm `issued`.
    pub display_offset_minutes: i32,
    /// Nhãn hiển thị khi Observation không có `issued`.
    pub unknown_issued_label: String,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            display_offset_minutes: 0,
            unknown_issued_label: "unknown".to_string(),
        }
    }
}

/// Giá trị hiển thị của một ô trong bảng hoặc của phần giá trị trên tiêu đề.
///
/// `Absent` tương ứng với trường không tồn tại, khác với chuỗi rỗng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(untagged)]
pub enum DisplayValue {
    #[default]
    Absent,
    Text(String),
    Number(f64),
    /// Dữ liệu gốc, chưa được tóm tắt.
    Raw(Value),
}

impl DisplayValue {
    /// Trống theo nghĩa hiển thị: không tồn tại, chuỗi rỗng, số 0 hoặc `false`.
    pub fn is_blank(&self) -> bool {
        match self {
            DisplayValue::Absent => true,
            DisplayValue::Text(text) => text.is_empty(),
            DisplayValue::Number(number) => *number == 0.0 || number.is_nan(),
            DisplayValue::Raw(Value::Null) => true,
            DisplayValue::Raw(Value::String(text)) => text.is_empty(),
            DisplayValue::Raw(Value::Bool(flag)) => !flag,
            DisplayValue::Raw(Value::Number(number)) => number.as_f64() == Some(0.0),
            DisplayValue::Raw(_) => false,
        }
    }
}

impl From<Option<String>> for DisplayValue {
    fn from(value: Option<String>) -> Self {
        value.map(DisplayValue::Text).unwrap_or_default()
    }
}

impl From<String> for DisplayValue {
    fn from(value: String) -> Self {
        DisplayValue::Text(value)
    }
}

impl From<&str> for DisplayValue {
    fn from(value: &str) -> Self {
        DisplayValue::Text(value.to_string())
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Absent => Ok(()),
            DisplayValue::Text(text) => f.write_str(text),
            DisplayValue::Number(number) => write!(f, "{number}"),
            DisplayValue::Raw(Value::Null) => Ok(()),
            DisplayValue::Raw(Value::String(text)) => f.write_str(text),
            DisplayValue::Raw(other) => write!(f, "{other}"),
        }
    }
}

/// Một dòng trong bảng thuộc tính.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeRow {
    pub label: String,
    pub value: DisplayValue,
}

impl AttributeRow {
    pub fn new(label: impl Into<String>, value: DisplayValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Kết quả dựng tile cho một Observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ObservationTile {
    /// `id` của resource gốc nếu có.
    pub id: Option<String>,
    /// Dòng tiêu đề "<code>: <value>", chỉ có khi cả hai phần đều không trống.
    pub header: Option<String>,
    /// Bảng thuộc tính, luôn đầy đủ và đúng thứ tự.
    pub attributes: Vec<AttributeRow>,
}

impl ObservationTile {
    /// Tìm dòng theo nhãn.
    pub fn row(&self, label: &str) -> Option<&AttributeRow> {
        self.attributes.iter().find(|row| row.label == label)
    }
}

/// Ghép tiêu đề từ phần tóm tắt mã và phần giá trị.
pub fn header_text(code: &DisplayValue, value: &DisplayValue) -> Option<String> {
    if code.is_blank() || value.is_blank() {
        return None;
    }
    Some(format!("{code}: {value}"))
}

/// Lỗi chung khi dựng tile.
#[derive(Debug, thiserror::Error)]
pub enum TileError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
}
