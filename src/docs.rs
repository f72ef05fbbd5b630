use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::attendance::model::{
    Attendance, AttendanceRate, AttendanceWithRelations, CreateAttendanceDto,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{ChangePasswordDto, LoginRequest, LoginResponse, SignupDto};
use crate::modules::classrooms::model::{
    AvailabilityResponse, Classroom, ClassroomInfo, CreateClassroomDto, UpdateClassroomDto,
};
use crate::modules::courses::model::{
    Course, CourseInfo, CourseWithRelations, CreateCourseDto, UpdateCourseDto,
};
use crate::modules::exams::model::{
    CreateExamDto, CreateExamResultDto, Exam, ExamInfo, ExamResult, ExamResultWithRelations,
    ExamStatistics, ExamWithRelations,
};
use crate::modules::lessons::model::{
    CreateLessonDto, Lesson, LessonInfo, LessonWithRelations, UpdateLessonDto,
};
use crate::modules::registrations::model::{
    CreateRegistrationDto, Registration, RegistrationInfo, RegistrationStatus,
    RegistrationWithRelations,
};
use crate::modules::roles::model::{CreateRoleDto, Role, RoleInfo, RoleName};
use crate::modules::school_classes::model::{
    CreateSchoolClassDto, SchoolClass, SchoolClassInfo, SchoolClassWithRelations,
    UpdateSchoolClassDto,
};
use crate::modules::subjects::model::{
    CreateSubjectDto, Subject, SubjectInfo, SubjectWithRelations, UpdateSubjectDto,
};
use crate::modules::users::model::{
    AssignRoleDto, PaginatedUsersResponse, UpdateProfileDto, User, UserInfo, UserWithRole,
};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::signup,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::change_password,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::assign_role,
        crate::modules::roles::controller::get_roles,
        crate::modules::roles::controller::get_role,
        crate::modules::roles::controller::get_role_by_name,
        crate::modules::roles::controller::create_role,
        crate::modules::classrooms::controller::create_classroom,
        crate::modules::classrooms::controller::get_classrooms,
        crate::modules::classrooms::controller::get_classroom,
        crate::modules::classrooms::controller::update_classroom,
        crate::modules::classrooms::controller::delete_classroom,
        crate::modules::classrooms::controller::get_availability,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_teacher_subjects,
        crate::modules::subjects::controller::get_subject,
        crate::modules::subjects::controller::update_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::subjects::controller::add_course,
        crate::modules::subjects::controller::remove_course,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::school_classes::controller::create_school_class,
        crate::modules::school_classes::controller::get_school_classes,
        crate::modules::school_classes::controller::get_school_class,
        crate::modules::school_classes::controller::update_school_class,
        crate::modules::school_classes::controller::delete_school_class,
        crate::modules::school_classes::controller::add_teacher,
        crate::modules::school_classes::controller::remove_teacher,
        crate::modules::registrations::controller::create_registration,
        crate::modules::registrations::controller::get_registrations,
        crate::modules::registrations::controller::get_registration,
        crate::modules::registrations::controller::complete_registration,
        crate::modules::registrations::controller::cancel_registration,
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::get_lessons,
        crate::modules::lessons::controller::get_lesson,
        crate::modules::lessons::controller::update_lesson,
        crate::modules::lessons::controller::delete_lesson,
        crate::modules::exams::controller::create_exam,
        crate::modules::exams::controller::get_exams,
        crate::modules::exams::controller::get_exam,
        crate::modules::exams::controller::delete_exam,
        crate::modules::exams::controller::add_course,
        crate::modules::exams::controller::remove_course,
        crate::modules::exams::controller::record_result,
        crate::modules::exams::controller::get_exam_results,
        crate::modules::exams::controller::get_exam_statistics,
        crate::modules::exams::controller::get_result,
        crate::modules::exams::controller::get_student_results,
        crate::modules::attendance::controller::create_attendance,
        crate::modules::attendance::controller::get_attendance,
        crate::modules::attendance::controller::get_lesson_attendance,
        crate::modules::attendance::controller::get_student_attendance,
        crate::modules::attendance::controller::get_attendance_rate,
    ),
    components(
        schemas(
            SignupDto,
            LoginRequest,
            LoginResponse,
            ChangePasswordDto,
            ErrorResponse,
            User,
            UserInfo,
            UserWithRole,
            UpdateProfileDto,
            AssignRoleDto,
            PaginatedUsersResponse,
            PaginationParams,
            PaginationMeta,
            Role,
            RoleInfo,
            RoleName,
            CreateRoleDto,
            Classroom,
            ClassroomInfo,
            CreateClassroomDto,
            UpdateClassroomDto,
            AvailabilityResponse,
            Subject,
            SubjectInfo,
            SubjectWithRelations,
            CreateSubjectDto,
            UpdateSubjectDto,
            Course,
            CourseInfo,
            CourseWithRelations,
            CreateCourseDto,
            UpdateCourseDto,
            SchoolClass,
            SchoolClassInfo,
            SchoolClassWithRelations,
            CreateSchoolClassDto,
            UpdateSchoolClassDto,
            Registration,
            RegistrationInfo,
            RegistrationStatus,
            RegistrationWithRelations,
            CreateRegistrationDto,
            Lesson,
            LessonInfo,
            LessonWithRelations,
            CreateLessonDto,
            UpdateLessonDto,
            Exam,
            ExamInfo,
            ExamWithRelations,
            CreateExamDto,
            ExamResult,
            ExamResultWithRelations,
            CreateExamResultDto,
            ExamStatistics,
            Attendance,
            AttendanceWithRelations,
            CreateAttendanceDto,
            AttendanceRate,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Signup, login and password management"),
        (name = "Users", description = "User and role assignment management"),
        (name = "Roles", description = "Role catalog"),
        (name = "Classrooms", description = "Classroom management and availability"),
        (name = "Subjects", description = "Subject management"),
        (name = "Courses", description = "Course management"),
        (name = "School classes", description = "School class and teacher assignment management"),
        (name = "Registrations", description = "Student registration lifecycle"),
        (name = "Lessons", description = "Lesson scheduling"),
        (name = "Exams", description = "Exams, results and statistics"),
        (name = "Attendance", description = "Attendance records and rates")
    ),
    info(
        title = "Markbook API",
        version = "0.1.0",
        description = "A school-management REST API built with Rust, Axum, and PostgreSQL featuring JWT-based authentication.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
