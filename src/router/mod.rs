//! Named routes of the console and the guard that gates them.
//!
//! DESIGN
//! ======
//! Navigation decisions refer to routes by name ([`RouteName`]); paths only
//! appear in the table below, so redirects never hard-code URLs.

pub mod guard;
pub mod progress;


/// Every named route in the console. Unknown paths have no name and fall
/// through to the not-found page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteName {
    Dashboard,
    Users,
    Students,
    Faculty,
    Devices,
    DeviceBoards,
    Rooms,
    Subjects,
    Schedules,
    Sections,
    SectionSubjects,
    SectionSubjectStudents,
    SectionSubjectSchedules,
    Profile,
    SignIn,
    SignUp,
    ForgotPassword,
}

impl RouteName {
    pub const ALL: [Self; 17] = [
        Self::Dashboard,
        Self::Users,
        Self::Students,
        Self::Faculty,
        Self::Devices,
        Self::DeviceBoards,
        Self::Rooms,
        Self::Subjects,
        Self::Schedules,
        Self::Sections,
        Self::SectionSubjects,
        Self::SectionSubjectStudents,
        Self::SectionSubjectSchedules,
        Self::Profile,
        Self::SignIn,
        Self::SignUp,
        Self::ForgotPassword,
    ];

    /// Stable route name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Users => "users",
            Self::Students => "students",
            Self::Faculty => "faculty",
            Self::Devices => "devices",
            Self::DeviceBoards => "deviceBoards",
            Self::Rooms => "rooms",
            Self::Subjects => "subjects",
            Self::Schedules => "schedules",
            Self::Sections => "sections",
            Self::SectionSubjects => "sectionSubjects",
            Self::SectionSubjectStudents => "sectionSubjectStudents",
            Self::SectionSubjectSchedules => "sectionSubjectSchedules",
            Self::Profile => "backend-pages-generic-profile",
            Self::SignIn => "auth-signin",
            Self::SignUp => "auth-signup",
            Self::ForgotPassword => "auth-forgot-password",
        }
    }

    /// Path the route is mounted at.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/dashboard",
            Self::Users => "/users",
            Self::Students => "/students",
            Self::Faculty => "/faculty",
            Self::Devices => "/devices",
            Self::DeviceBoards => "/device-boards",
            Self::Rooms => "/rooms",
            Self::Subjects => "/subjects",
            Self::Schedules => "/schedules",
            Self::Sections => "/sections",
            Self::SectionSubjects => "/section-subjects",
            Self::SectionSubjectStudents => "/section-subject-students",
            Self::SectionSubjectSchedules => "/section-subject-schedules",
            Self::Profile => "/profile",
            Self::SignIn => "/signin",
            Self::SignUp => "/signup",
            Self::ForgotPassword => "/forgot-password",
        }
    }

    /// Page heading.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Users => "Users",
            Self::Students => "Students",
            Self::Faculty => "Faculty",
            Self::Devices => "Devices",
            Self::DeviceBoards => "Device Boards",
            Self::Rooms => "Rooms",
            Self::Subjects => "Subjects",
            Self::Schedules => "Schedules",
            Self::Sections => "Sections",
            Self::SectionSubjects => "Section Subjects",
            Self::SectionSubjectStudents => "Section Subject Students",
            Self::SectionSubjectSchedules => "Section Subject Schedules",
            Self::Profile => "Profile",
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
            Self::ForgotPassword => "Forgot Password",
        }
    }

    /// Resolve a location pathname. `/` is an alias of the dashboard and a
    /// trailing slash is ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Self::Dashboard);
        }
        Self::ALL.into_iter().find(|route| route.path() == trimmed)
    }
}
