#![allow(dead_code)]

use linedb_core::{Document, LogFormat, Scalar, Store, StoreConfig};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;
use tempfile::NamedTempFile;

pub const MAX_LINE: &str =
    r#"E{"type":"user","name":"Max Mustermann","age":25,"occupation":"Chimney sweep"}"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub age: u32,
    pub occupation: String,
}

impl Person {
    pub fn new(kind: &str, name: &str, age: u32, occupation: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            age,
            occupation: occupation.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonField {
    Type,
    Name,
    Age,
    Occupation,
}

impl AsRef<str> for PersonField {
    fn as_ref(&self) -> &str {
        match self {
            Self::Type => "type",
            Self::Name => "name",
            Self::Age => "age",
            Self::Occupation => "occupation",
        }
    }
}

impl FromStr for PersonField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "type" => Ok(Self::Type),
            "name" => Ok(Self::Name),
            "age" => Ok(Self::Age),
            "occupation" => Ok(Self::Occupation),
            other => Err(format!("unknown person field `{other}`")),
        }
    }
}

impl Document for Person {
    type Field = PersonField;

    fn scalar(&self, field: &PersonField) -> Option<Scalar> {
        let value = match field {
            PersonField::Type => Scalar::from(self.kind.as_str()),
            PersonField::Name => Scalar::from(self.name.as_str()),
            PersonField::Age => Scalar::from(self.age),
            PersonField::Occupation => Scalar::from(self.occupation.as_str()),
        };
        Some(value)
    }
}

/// Writes `lines` to a temp log file that lives as long as the handle.
pub fn write_log(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

pub fn person_line(tag: char, person: &Person) -> String {
    format!("{tag}{}", serde_json::to_string(person).unwrap())
}

/// Loads a tagged person store indexing `occupation`.
pub fn open_people(lines: &[&str]) -> (NamedTempFile, Store<Person>) {
    let file = write_log(lines);
    let config = StoreConfig::new(file.path())
        .text_fields([PersonField::Occupation])
        .log_format(LogFormat::Tagged);
    let store = Store::open(config).unwrap();
    (file, store)
}

pub fn names(people: &[Person]) -> Vec<String> {
    people.iter().map(|person| person.name.clone()).collect()
}
