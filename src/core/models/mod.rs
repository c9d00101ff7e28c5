//! Data models for `NuPathways`

pub mod course;
pub mod plan;
pub mod profile;
pub mod requirement;
pub mod term;

pub use course::{Category, Course, CourseId, EdgeKind};
pub use plan::{
    ChoiceKind, ChoiceOption, ChoiceRequest, PendingChoice, Plan, ScheduledCourse,
    SemesterSchedule,
};
pub use profile::{CreditLoad, GraduationGoal, StudentProfile};
pub use requirement::{Major, Requirement, Track};
pub use term::{ClassLevel, Season, TermIndex};
