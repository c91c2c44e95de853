use chrono::{DateTime, SubsecRound, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    folders::FolderId,
    validation::{required, supplied},
    Error, Result,
};

pub type NoteId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Note {
    pub id: NoteId,
    pub note_name: String,
    pub content: String,
    pub date_modified: DateTime<Utc>,
    pub folder_id: FolderId,
}

/// Body of `POST /api/notes`. Every field is optional here so that a missing
/// one is reported by name instead of as a generic deserialization error.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CreateNote {
    pub note_name: Option<String>,
    pub content: Option<String>,
    pub folder_id: Option<FolderId>,
    /// Defaults to the time of creation, stored with millisecond precision
    pub date_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub note_name: String,
    pub content: String,
    pub folder_id: FolderId,
    pub date_modified: Option<DateTime<Utc>>,
}

impl CreateNote {
    /// Checks required fields in declaration order, first missing one wins.
    pub fn into_new_note(self) -> Result<NewNote> {
        Ok(NewNote {
            note_name: required("note_name", self.note_name)?,
            content: required("content", self.content)?,
            folder_id: required("folder_id", self.folder_id)?,
            date_modified: self.date_modified.map(|date| date.trunc_subsecs(3)),
        })
    }
}

/// Body of `PATCH /api/notes/{note_id}`
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdateNote {
    pub note_name: Option<String>,
    pub content: Option<String>,
    pub folder_id: Option<FolderId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteChanges {
    pub note_name: Option<String>,
    pub content: Option<String>,
    pub folder_id: Option<FolderId>,
}

impl UpdateNote {
    pub fn into_changes(self) -> Result<NoteChanges> {
        let changes = NoteChanges {
            note_name: supplied(self.note_name),
            content: supplied(self.content),
            folder_id: supplied(self.folder_id),
        };

        if changes == NoteChanges::default() {
            return Err(Error::Validation(
                "Request body must contain either 'note_name', 'content' or 'folder_id'".into(),
            ));
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_note() -> CreateNote {
        CreateNote {
            note_name: Some("Test new note".into()),
            content: Some("This is a super test".into()),
            folder_id: Some(1),
            date_modified: None,
        }
    }

    fn validation_message(result: Result<NewNote>) -> String {
        match result {
            Err(Error::Validation(message)) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn each_missing_field_is_named() {
        let cases: [(&str, fn(&mut CreateNote)); 3] = [
            ("note_name", |n| n.note_name = None),
            ("content", |n| n.content = None),
            ("folder_id", |n| n.folder_id = None),
        ];

        for (field, remove) in cases {
            let mut note = create_note();
            remove(&mut note);
            assert_eq!(
                validation_message(note.into_new_note()),
                format!("Missing {field} in request")
            );
        }
    }

    #[test]
    fn date_modified_is_truncated_to_milliseconds() {
        let date_modified = "2020-01-01T00:00:00.123456789Z".parse::<DateTime<Utc>>().unwrap();
        let note = CreateNote {
            date_modified: Some(date_modified),
            ..create_note()
        };

        let new_note = note.into_new_note().unwrap();
        assert_eq!(
            new_note.date_modified.unwrap().to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            "2020-01-01T00:00:00.123Z"
        );
    }

    #[test]
    fn first_missing_field_wins() {
        let note = CreateNote {
            folder_id: Some(1),
            ..Default::default()
        };
        assert_eq!(validation_message(note.into_new_note()), "Missing note_name in request");

        let note = CreateNote {
            note_name: Some("name".into()),
            ..Default::default()
        };
        assert_eq!(validation_message(note.into_new_note()), "Missing content in request");
    }

    #[test]
    fn valid_note_passes() {
        let note = create_note().into_new_note().unwrap();
        assert_eq!(note.note_name, "Test new note");
        assert_eq!(note.folder_id, 1);
        assert_eq!(note.date_modified, None);
    }

    #[test]
    fn update_needs_a_known_field() {
        assert!(matches!(UpdateNote::default().into_changes(), Err(Error::Validation(_))));

        let blank = UpdateNote {
            note_name: Some(String::new()),
            ..Default::default()
        };
        assert!(blank.into_changes().is_err());

        let changes = UpdateNote {
            content: Some("new".into()),
            ..Default::default()
        }
        .into_changes()
        .unwrap();
        assert_eq!(changes.content.as_deref(), Some("new"));
        assert_eq!(changes.note_name, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let update: UpdateNote = serde_json::from_str(r#"{"unrelatedField": "foo"}"#).unwrap();
        assert!(update.into_changes().is_err());
    }
}
