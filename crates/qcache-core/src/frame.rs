//! 資料框（列式時間序列）模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::Value;

/// 標籤集合（排序鍵，保證序列化穩定）
pub type Labels = BTreeMap<String, String>;

/// 欄位類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 時間戳（毫秒）
    Time,
    /// 數值
    Number,
    /// 字串
    String,
    /// 布林
    Boolean,
    /// 其他
    Other,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::Time => "time",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Other => "other",
        };
        f.write_str(s)
    }
}

/// 欄位顯示配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// 顯示名稱
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// 單位
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// 資料點間隔（毫秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
}

/// 欄位（一個具名、具型別的值序列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// 欄位名稱
    pub name: String,

    /// 欄位類型
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// 標籤
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,

    /// 顯示配置
    #[serde(default)]
    pub config: FieldConfig,

    /// 值
    pub values: Vec<Value>,
}

impl Field {
    /// 創建新的欄位
    pub fn new(name: impl Into<String>, field_type: FieldType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            field_type,
            labels: None,
            config: FieldConfig::default(),
            values,
        }
    }

    /// 創建時間欄位
    pub fn time(name: impl Into<String>, timestamps: impl IntoIterator<Item = i64>) -> Self {
        Self::new(
            name,
            FieldType::Time,
            timestamps.into_iter().map(Value::Int).collect(),
        )
    }

    /// 創建數值欄位
    pub fn number(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(
            name,
            FieldType::Number,
            values.into_iter().map(Value::Float).collect(),
        )
    }

    /// 建構器模式：設置標籤
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = Some(labels);
        self
    }

    /// 建構器模式：設置顯示配置
    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// 欄位身分：`類型|名稱|標籤 JSON`
    ///
    /// 無標籤時標籤部分為 `""`
    pub fn ident(&self) -> String {
        let labels = match &self.labels {
            Some(labels) => serde_json::to_string(labels).unwrap_or_default(),
            None => "\"\"".to_string(),
        };
        format!("{}|{}|{}", self.field_type, self.name, labels)
    }

    /// 值的數量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否沒有值
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 資料框：等長欄位的有序集合，第一個欄位為遞增時間戳
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFrame {
    /// 框名稱
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// 所屬查詢目標的 refId
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,

    /// 欄位
    pub fields: Vec<Field>,
}

impl DataFrame {
    /// 創建新的資料框
    pub fn new(ref_id: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: None,
            ref_id: Some(ref_id.into()),
            fields,
        }
    }

    /// 建構器模式：設置名稱
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 列數（以時間欄位為準）
    pub fn len(&self) -> usize {
        self.fields.first().map(Field::len).unwrap_or(0)
    }

    /// 是否沒有列或沒有欄位
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() || self.len() == 0
    }

    /// 序列身分
    ///
    /// 取第二個欄位（第一個非時間欄位）的身分；只有時間欄位時退回第一個欄位
    pub fn series_ident(&self) -> Option<String> {
        self.fields
            .get(1)
            .or_else(|| self.fields.first())
            .map(Field::ident)
    }

    /// 以列式表格形式取出所有欄位值
    pub fn columns(&self) -> Vec<Vec<Value>> {
        self.fields.iter().map(|f| f.values.clone()).collect()
    }
}
