//! Seed rows and seeding configuration.

use chrono::NaiveDate;
use uuid::Uuid;

/// Demo class: name, code, grade, subject.
pub type ClassSeed = (&'static str, &'static str, &'static str, &'static str);

pub const DEMO_CLASSES: [ClassSeed; 12] = [
    ("Crèche", "CR-01", "Crèche", "General"),
    ("Kindergarten 1", "KG1-01", "KG1", "General"),
    ("Kindergarten 2", "KG2-01", "KG2", "General"),
    ("Grade 1", "G1-01", "Grade 1", "General"),
    ("Grade 2", "G2-01", "Grade 2", "General"),
    ("Grade 3", "G3-01", "Grade 3", "General"),
    ("Grade 4", "G4-01", "Grade 4", "General"),
    ("Grade 5", "G5-01", "Grade 5", "General"),
    ("Grade 6", "G6-01", "Grade 6", "General"),
    ("Grade 7", "G7-01", "Grade 7", "General"),
    ("Grade 8", "G8-01", "Grade 8", "General"),
    ("Grade 9", "G9-01", "Grade 9", "General"),
];

/// Seed data for a user account. Ids are assigned client-side so the
/// dependent teacher/student row can be matched to its user.
pub struct UserSeed {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
}

pub struct TeacherSeed {
    pub user: UserSeed,
    pub staff_id: String,
    pub subjects: Vec<String>,
    pub qualification: String,
    pub experience: i32,
    pub department: String,
    pub gender: String,
}

pub struct StudentSeed {
    pub user: UserSeed,
    pub student_code: String,
    pub admission_number: String,
    pub class_id: Option<Uuid>,
    pub class_name: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub enrollment_date: NaiveDate,
}

/// How many fake records to generate.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub teachers: usize,
    pub students: usize,
    /// Plain-text password shared by every seeded account.
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 10,
            students: 200,
            password: "password123".to_string(),
        }
    }
}

impl SeedConfig {
    pub fn new(teachers: usize, students: usize) -> Self {
        Self {
            teachers,
            students,
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}
