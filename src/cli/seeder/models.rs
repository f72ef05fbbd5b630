use chrono::NaiveDate;
use uuid::Uuid;

pub struct UserSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub birth_date: NaiveDate,
    pub role_id: Uuid,
}

pub struct ClassroomSeed {
    pub name: String,
    pub capacity: i32,
}

pub struct CourseSeed {
    pub title: String,
    pub description: Option<String>,
    pub duration_hours: i32,
    pub price_cents: i64,
}

pub struct SubjectSeed {
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: Uuid,
}

pub struct SchoolClassSeed {
    pub name: String,
    pub course_id: Uuid,
    pub max_students: i32,
}

#[derive(Clone)]
pub struct SeedConfig {
    pub teachers: usize,
    pub students: usize,
    pub classrooms: usize,
    pub courses: usize,
    pub classes_per_course: usize,
    pub students_per_class: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 10,
            students: 100,
            classrooms: 8,
            courses: 5,
            classes_per_course: 2,
            students_per_class: 10,
        }
    }
}

impl SeedConfig {
    pub fn total_users(&self) -> usize {
        self.teachers + self.students
    }

    pub fn total_classes(&self) -> usize {
        self.courses * self.classes_per_course
    }
}
