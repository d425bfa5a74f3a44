//! People who can be assigned to projects.

use serde::{Deserialize, Serialize};

use super::ids::PersonId;

/// A person in the staffing pool.
///
/// The core never edits a person in place; a changed person is a new value
/// that replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub role: String,

    /// Skill tags. Matching is exact and case-sensitive.
    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub experience_years: u32,
}

/// Input for `add_person`: everything except the identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: u32,
}

impl NewPerson {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            skills: Vec::new(),
            experience_years: 0,
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_experience(mut self, years: u32) -> Self {
        self.experience_years = years;
        self
    }

    /// Turn the input into a `Person` with the given id.
    ///
    /// Blank tags and repeated tags (after the first occurrence) are dropped.
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            skills: dedup_tags(self.skills),
            experience_years: self.experience_years,
        }
    }
}

/// Remove blank and duplicate tags, keeping the first occurrence of each.
pub(crate) fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[test]
    fn into_person_dedups_skills_case_sensitively() {
        let id = PersonId::from_ulid(Ulid::new());
        let person = NewPerson::new(" Ada ", "Engineer")
            .with_skills(["Rust", "rust", "Rust", " ", "SQL"])
            .with_experience(7)
            .into_person(id);

        assert_eq!(person.name, "Ada");
        assert_eq!(person.skills, vec!["Rust", "rust", "SQL"]);
    }

    #[test]
    fn person_json_uses_camel_case() {
        let person = NewPerson::new("Ada", "Engineer")
            .with_experience(3)
            .into_person(PersonId::from_ulid(Ulid::new()));
        let v = serde_json::to_value(&person).unwrap();
        assert_eq!(v["experienceYears"], 3);
        assert!(v["id"].as_str().unwrap().starts_with("person-"));
    }
}
