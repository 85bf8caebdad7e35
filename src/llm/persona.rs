//! Persona prompt describing the portfolio owner.

use crate::config::ServerConfig;

/// Facts about the default owner the model is allowed to talk about.
pub const DEFAULT_PROFILE: &str = "\
Background: 4th-year Computer Science student at Graphic Era Hill University (CGPA 7.89), \
previously at St. Lawrence School, Haldwani.
Experience: Full Stack Web Developer Intern at BharatPe, building MERN stack applications \
and RESTful APIs.
Projects:
- YogaMate: digital wellness platform with real-time HD WebRTC video, 50+ concurrent live \
sessions, JWT auth, role-based access and an analytics dashboard.
- Virtual File Explorer CLI: browser-based shell over a virtual file system (mkdir, cd, \
touch, ls) styled with Tailwind CSS.
- Apple Plant Disease Detection: Random Forest classifier served through a Flask app with \
image upload.
Skills: JavaScript, TypeScript, Python, Java, C++, React.js, Next.js, Tailwind CSS, \
Material UI, Node.js, Express.js, REST APIs, MongoDB, PostgreSQL, MySQL, Git/GitHub, \
Vercel, machine learning, data analysis.
Contact: through the contact section of the portfolio website.";

/// System prompt wrapper for one portfolio owner.
///
/// The profile defaults to [`DEFAULT_PROFILE`]; an owner other than the
/// default one should come with a profile of their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Persona {
    owner_name: String,
    profile: String,
}

impl Persona {
    /// Persona speaking about `owner_name` with the built-in profile.
    #[must_use]
    pub fn new(owner_name: impl Into<String>) -> Self {
        Self {
            owner_name: owner_name.into(),
            profile: DEFAULT_PROFILE.to_string(),
        }
    }

    /// Persona for the configured owner and profile.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let mut persona = Self::new(config.owner_name.clone());
        if let Some(profile) = &config.profile {
            persona = persona.with_profile(profile.clone());
        }
        persona
    }

    /// Replace the facts. Blank text keeps the current profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        let profile = profile.into();
        if !profile.trim().is_empty() {
            self.profile = profile.trim().to_string();
        }
        self
    }

    /// System prompt sent ahead of every visitor message.
    #[must_use]
    pub fn system_prompt(&self) -> String {
        format!(
            "You are the friendly, upbeat assistant on {name}'s portfolio website. \
             Answer questions about {name} in a few short sentences, using markdown and the \
             occasional emoji. Only use the facts below; if you do not know something, say so \
             and suggest asking about projects, skills, education or experience.\n\n\
             About {name}:\n{profile}",
            name = self.owner_name,
            profile = self.profile
        )
    }

    /// Full prompt for one visitor message.
    #[must_use]
    pub fn prompt_for(&self, message: &str) -> String {
        format!("{}\n\nUser: {}\nAssistant:", self.system_prompt(), message.trim())
    }
}
