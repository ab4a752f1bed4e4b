//! 论文元数据
//!
//! 必填字段：title、author、year；year 必须在 [2000, 2030] 内

use crate::error::ValidationError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2030;

/// 培养形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyForm {
    Bachelor,
    Master,
    Specialist,
    Postgraduate,
}

impl StudyForm {
    pub const ALL: [StudyForm; 4] = [
        StudyForm::Bachelor,
        StudyForm::Master,
        StudyForm::Specialist,
        StudyForm::Postgraduate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StudyForm::Bachelor => "bachelor",
            StudyForm::Master => "master",
            StudyForm::Specialist => "specialist",
            StudyForm::Postgraduate => "postgraduate",
        }
    }
}

impl FromStr for StudyForm {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        StudyForm::ALL
            .into_iter()
            .find(|form| form.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidForm {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for StudyForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 元数据字段名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    Title,
    Author,
    Supervisor,
    Year,
    Faculty,
    Form,
}

impl MetadataField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::Title => "title",
            MetadataField::Author => "author",
            MetadataField::Supervisor => "supervisor",
            MetadataField::Year => "year",
            MetadataField::Faculty => "faculty",
            MetadataField::Form => "form",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 用户填写的元数据
///
/// 序列化结果即 `/api/prepare` 请求中的 `metadata` 对象，空的可选字段不会出现在 JSON 中
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<StudyForm>,
}

impl Metadata {
    /// 更新单个字段，其它字段保持不变
    ///
    /// 值无效时返回错误，字段保留原值
    pub fn set_field(&mut self, field: MetadataField, value: &str) -> Result<(), ValidationError> {
        match field {
            MetadataField::Title => self.title = value.to_string(),
            MetadataField::Author => self.author = value.to_string(),
            MetadataField::Supervisor => self.supervisor = optional_text(value),
            MetadataField::Faculty => self.faculty = optional_text(value),
            MetadataField::Year => self.year = parse_year(value)?,
            MetadataField::Form => {
                self.form = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.parse()?)
                }
            }
        }
        Ok(())
    }

    /// 不满足要求的必填字段（按 title、author、year 顺序）
    pub fn missing_fields(&self) -> Vec<MetadataField> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push(MetadataField::Title);
        }
        if self.author.trim().is_empty() {
            missing.push(MetadataField::Author);
        }
        if !self.year.is_some_and(|year| (MIN_YEAR..=MAX_YEAR).contains(&year)) {
            missing.push(MetadataField::Year);
        }
        missing
    }

    pub fn is_submittable(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

fn optional_text(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_year(value: &str) -> Result<Option<i32>, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidYear {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete() -> Metadata {
        Metadata {
            title: "Органы местного самоуправления".to_string(),
            author: "Иванов Иван".to_string(),
            year: Some(2025),
            ..Default::default()
        }
    }

    #[test]
    fn complete_metadata_is_submittable() {
        assert!(complete().is_submittable());
    }

    #[test]
    fn empty_title_blocks_submission() {
        let mut metadata = complete();
        metadata.set_field(MetadataField::Title, "").unwrap();
        assert!(!metadata.is_submittable());
        assert_eq!(metadata.missing_fields(), vec![MetadataField::Title]);
    }

    #[test]
    fn whitespace_author_counts_as_empty() {
        let mut metadata = complete();
        metadata.set_field(MetadataField::Author, "   ").unwrap();
        assert_eq!(metadata.missing_fields(), vec![MetadataField::Author]);
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let mut metadata = complete();
        for (year, ok) in [("1999", false), ("2000", true), ("2030", true), ("2031", false)] {
            metadata.set_field(MetadataField::Year, year).unwrap();
            assert_eq!(metadata.is_submittable(), ok, "year {year}");
        }
    }

    #[test]
    fn invalid_year_keeps_previous_value() {
        let mut metadata = complete();
        let err = metadata.set_field(MetadataField::Year, "twenty").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidYear { .. }));
        assert_eq!(metadata.year, Some(2025));

        metadata.set_field(MetadataField::Year, "").unwrap();
        assert_eq!(metadata.year, None);
        assert_eq!(metadata.missing_fields(), vec![MetadataField::Year]);
    }

    #[test]
    fn set_field_touches_only_one_field() {
        let mut metadata = complete();
        metadata.set_field(MetadataField::Supervisor, "Петров П.П.").unwrap();
        assert_eq!(metadata.supervisor.as_deref(), Some("Петров П.П."));
        assert_eq!(metadata.title, complete().title);
        assert_eq!(metadata.author, complete().author);
        assert_eq!(metadata.year, Some(2025));
        assert_eq!(metadata.faculty, None);
    }

    #[test]
    fn form_accepts_enumeration_or_empty() {
        let mut metadata = complete();
        metadata.set_field(MetadataField::Form, "Master").unwrap();
        assert_eq!(metadata.form, Some(StudyForm::Master));

        let err = metadata.set_field(MetadataField::Form, "doctor").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidForm { .. }));
        assert_eq!(metadata.form, Some(StudyForm::Master));

        metadata.set_field(MetadataField::Form, "").unwrap();
        assert_eq!(metadata.form, None);
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let mut metadata = complete();
        metadata.set_field(MetadataField::Form, "bachelor").unwrap();
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Органы местного самоуправления",
                "author": "Иванов Иван",
                "year": 2025,
                "form": "bachelor"
            })
        );
    }
}
