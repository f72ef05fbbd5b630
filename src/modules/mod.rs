pub mod attendance;
pub mod auth;
pub mod classrooms;
pub mod courses;
pub mod exams;
pub mod lessons;
pub mod registrations;
pub mod roles;
pub mod school_classes;
pub mod subjects;
pub mod users;
