//! Which screens exist and who may open them.
//!
//! Navigation branches once on the [`Session`] variant; there is no
//! per-screen token lookup.

use safecampus_shared::types::PrincipalKind;

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    // Signed out
    Intro,
    Login,
    Signup,

    // Student
    StudentHome,
    StudentProfile,
    EmergencyContacts,
    AddEmergencyContact,
    ReportIncident,
    AddPost,
    MyPosts,
    Helplines,
    Articles,
    SafetyAlert,

    // Admin
    AdminHome,
    AdminProfile,
    SafetyDetails,
    AddArticle,
    ManageArticles,
    AddHelpline,
    ManageHelplines,
    Incidents,
    StudentPosts,
    Accounts,
}

/// Who a screen is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    SignedOut,
    Signed(PrincipalKind),
}

const SIGNED_OUT_MENU: &[Screen] = &[Screen::Intro, Screen::Login, Screen::Signup];

const STUDENT_MENU: &[Screen] = &[
    Screen::StudentHome,
    Screen::StudentProfile,
    Screen::SafetyAlert,
    Screen::EmergencyContacts,
    Screen::AddEmergencyContact,
    Screen::ReportIncident,
    Screen::AddPost,
    Screen::MyPosts,
    Screen::Helplines,
    Screen::Articles,
];

const ADMIN_MENU: &[Screen] = &[
    Screen::AdminHome,
    Screen::AdminProfile,
    Screen::SafetyDetails,
    Screen::AddArticle,
    Screen::ManageArticles,
    Screen::AddHelpline,
    Screen::ManageHelplines,
    Screen::Incidents,
    Screen::StudentPosts,
    Screen::Accounts,
];

impl Screen {
    pub fn audience(self) -> Audience {
        if SIGNED_OUT_MENU.contains(&self) {
            Audience::SignedOut
        } else if STUDENT_MENU.contains(&self) {
            Audience::Signed(PrincipalKind::Student)
        } else {
            Audience::Signed(PrincipalKind::Admin)
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Intro => "Welcome",
            Screen::Login => "Login",
            Screen::Signup => "Sign Up",
            Screen::StudentHome | Screen::AdminHome => "Home",
            Screen::StudentProfile | Screen::AdminProfile => "Profile",
            Screen::EmergencyContacts => "Emergency Contacts",
            Screen::AddEmergencyContact => "Add Emergency Contact",
            Screen::ReportIncident => "Report Incident",
            Screen::AddPost => "Add Post",
            Screen::MyPosts => "My Posts",
            Screen::Helplines => "Helpline Numbers",
            Screen::Articles => "Articles",
            Screen::SafetyAlert => "Safety Alert",
            Screen::SafetyDetails => "Safety Details",
            Screen::AddArticle => "Add Article",
            Screen::ManageArticles => "Manage Articles",
            Screen::AddHelpline => "Add Helpline Number",
            Screen::ManageHelplines => "Manage Helpline Numbers",
            Screen::Incidents => "Incidents",
            Screen::StudentPosts => "Student Posts",
            Screen::Accounts => "Accounts",
        }
    }
}

fn audience_of(session: &Session) -> Audience {
    match session.kind() {
        None => Audience::SignedOut,
        Some(kind) => Audience::Signed(kind),
    }
}

/// Landing screen right after startup or a login/logout.
pub fn home_screen(session: &Session) -> Screen {
    match session {
        Session::Anonymous => Screen::Login,
        Session::Student { .. } => Screen::StudentHome,
        Session::Admin { .. } => Screen::AdminHome,
    }
}

pub fn menu(session: &Session) -> &'static [Screen] {
    match session {
        Session::Anonymous => SIGNED_OUT_MENU,
        Session::Student { .. } => STUDENT_MENU,
        Session::Admin { .. } => ADMIN_MENU,
    }
}

pub fn can_open(session: &Session, screen: Screen) -> bool {
    screen.audience() == audience_of(session)
}

/// The screen actually shown when `target` is requested: the target itself
/// when allowed, the session's home screen otherwise.
pub fn navigate(session: &Session, target: Screen) -> Screen {
    if can_open(session, target) {
        target
    } else {
        tracing::debug!(?target, "navigation blocked");
        home_screen(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn student() -> Session {
        Session::Student {
            id: Uuid::new_v4(),
            token: "t".into(),
        }
    }

    fn admin() -> Session {
        Session::Admin {
            id: Uuid::new_v4(),
            token: "t".into(),
        }
    }

    #[test]
    fn test_home_screens() {
        assert_eq!(home_screen(&Session::Anonymous), Screen::Login);
        assert_eq!(home_screen(&student()), Screen::StudentHome);
        assert_eq!(home_screen(&admin()), Screen::AdminHome);
    }

    #[test]
    fn test_menus_only_hold_openable_screens() {
        for session in [Session::Anonymous, student(), admin()] {
            let items = menu(&session);
            assert!(items.contains(&home_screen(&session)) || !session.is_signed_in());
            for screen in items {
                assert!(can_open(&session, *screen), "{screen:?}");
            }
        }
    }

    #[test]
    fn test_guards() {
        assert!(!can_open(&Session::Anonymous, Screen::SafetyAlert));
        assert!(!can_open(&student(), Screen::SafetyDetails));
        assert!(!can_open(&admin(), Screen::ReportIncident));
        assert!(!can_open(&student(), Screen::Login));

        assert_eq!(navigate(&student(), Screen::Accounts), Screen::StudentHome);
        assert_eq!(navigate(&admin(), Screen::SafetyDetails), Screen::SafetyDetails);
        assert_eq!(navigate(&Session::Anonymous, Screen::AdminHome), Screen::Login);
    }
}
