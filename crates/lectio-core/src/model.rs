use serde::{Deserialize, Deserializer, Serialize};

pub const UNTITLED_LESSON: &str = "Untitled lesson";
pub const NO_TEACHER: &str = "No teacher listed";
pub const NO_ROOM: &str = "No room";
pub const REMOTE_ROOM: &str = "Remote";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub is_cache: bool,

    #[serde(default)]
    pub items: Vec<ScheduleItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    #[serde(default)]
    pub number: Option<i64>,

    #[serde(default)]
    pub days: Vec<Day>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub info: DayInfo,

    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Day {
    pub fn date_key(&self) -> &str {
        &self.info.date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayInfo {
    #[serde(default, rename = "type")]
    pub day_type: Option<i64>,

    #[serde(default)]
    pub week_number: Option<i64>,

    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(default)]
    pub number: Option<i64>,

    #[serde(default)]
    pub start_at: Option<String>,

    #[serde(default)]
    pub end_at: Option<String>,

    #[serde(default)]
    pub time_range: Option<String>,

    #[serde(
        default = "untitled_lesson_name",
        deserialize_with = "deserialize_lesson_name"
    )]
    pub lesson_name: String,

    #[serde(default)]
    pub teacher_id: Option<i64>,

    #[serde(default)]
    pub teacher_name: Option<String>,

    #[serde(default)]
    pub auditory_name: Option<String>,

    #[serde(default)]
    pub is_distant: Option<bool>,

    #[serde(default)]
    pub is_lecture: Option<bool>,
}

impl Lesson {
    pub fn display_teacher(&self) -> &str {
        self.teacher_name.as_deref().unwrap_or(NO_TEACHER)
    }

    pub fn display_auditory(&self) -> &str {
        let trimmed = self.auditory_name.as_deref().map(str::trim).unwrap_or("");
        if trimmed.is_empty() {
            if self.is_distant_lesson() {
                REMOTE_ROOM
            } else {
                NO_ROOM
            }
        } else {
            trimmed
        }
    }

    pub fn display_time(&self) -> &str {
        self.time_range.as_deref().unwrap_or("-")
    }

    pub fn is_distant_lesson(&self) -> bool {
        self.is_distant.unwrap_or(false)
    }

    pub fn is_lecture_lesson(&self) -> bool {
        self.is_lecture.unwrap_or(false)
    }
}

fn untitled_lesson_name() -> String {
    UNTITLED_LESSON.to_string()
}

// Upstream sends lessonName as a string, a list of strings, or null.
fn deserialize_lesson_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NameField {
        One(String),
        Many(Vec<String>),
    }

    let name = match Option::<NameField>::deserialize(deserializer)? {
        Some(NameField::One(name)) => name,
        Some(NameField::Many(names)) => names.join(", "),
        None => String::new(),
    };

    if name.is_empty() {
        Ok(untitled_lesson_name())
    } else {
        Ok(name)
    }
}
