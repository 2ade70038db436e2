//! CV content store
//!
//! The résumé is embedded at build time and rendered to one HTML panel per
//! zone. Every interpolated string is escaped; the markup around it is fixed.

use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::sim::ZoneId;

const EMBEDDED_CV: &str = include_str!("../assets/cv.json");

const CARD_STYLE: &str =
    "margin-bottom: 2rem; padding: 1rem; background: rgba(255,255,255,0.1); border-radius: 8px;";
const LINK_STYLE: &str = "color: #4facfe;";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personal {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub company: String,
    pub position: String,
    pub period: String,
    pub location: String,
    pub description: String,
}

/// Skills grouped by proficiency
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub proficient: Vec<String>,
    pub intermediate: Vec<String>,
    pub testing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Coursework {
    pub computer_science: Vec<String>,
    pub information_systems: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub major: String,
    pub graduation: String,
    pub location: String,
    #[serde(default)]
    pub coursework: Coursework,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Referee {
    pub name: String,
    pub position: String,
    pub company: String,
    pub phone: String,
    pub email: String,
}

/// The whole résumé
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvData {
    pub personal: Personal,
    pub experience: Vec<Job>,
    pub skills: Skills,
    pub projects: Vec<Project>,
    pub education: Education,
    #[serde(default)]
    pub referees: Vec<Referee>,
}

impl CvData {
    /// Parse the résumé bundled into the binary
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json(EMBEDDED_CV)
    }

    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let cv: Self = serde_json::from_str(json)?;
        cv.validate()?;
        Ok(cv)
    }

    /// Reject links that would land in an `href` with a non-web scheme
    pub fn validate(&self) -> Result<(), ContentError> {
        if !is_web_url(&self.personal.linkedin) {
            return Err(ContentError::UnsafeLink {
                field: "personal.linkedin",
                value: self.personal.linkedin.clone(),
            });
        }
        if !is_plain_email(&self.personal.email) {
            return Err(ContentError::UnsafeLink {
                field: "personal.email",
                value: self.personal.email.clone(),
            });
        }
        if let Some(r) = self.referees.iter().find(|r| !is_plain_email(&r.email)) {
            return Err(ContentError::UnsafeLink {
                field: "referees.email",
                value: r.email.clone(),
            });
        }
        Ok(())
    }

    /// Panel markup for a zone
    pub fn panel_html(&self, zone: ZoneId) -> String {
        match zone {
            ZoneId::Experience => self.experience_html(),
            ZoneId::Skills => self.skills_html(),
            ZoneId::Projects => self.projects_html(),
            ZoneId::Education => self.education_html(),
            ZoneId::Contact => self.contact_html(),
        }
    }

    fn experience_html(&self) -> String {
        let mut html = String::from("<h2>💼 Professional Experience</h2>");
        for job in &self.experience {
            html.push_str(&format!(
                "<div style=\"{CARD_STYLE}\"><h3>{} - {}</h3><p><strong>{} | {}</strong></p><p>{}</p></div>",
                escape(&job.company),
                escape(&job.position),
                escape(&job.period),
                escape(&job.location),
                escape(&job.description),
            ));
        }
        html
    }

    fn skills_html(&self) -> String {
        let mut html = String::from("<h2>🛠️ Technical Skills</h2>");
        let groups = [
            ("Proficient", &self.skills.proficient),
            ("Intermediate", &self.skills.intermediate),
            ("Testing", &self.skills.testing),
        ];
        for (label, items) in groups {
            if items.is_empty() {
                continue;
            }
            let joined: Vec<String> = items.iter().map(|s| escape(s)).collect();
            html.push_str(&format!(
                "<h3>{label}</h3><p>{}</p>",
                joined.join(" • ")
            ));
        }
        html
    }

    fn projects_html(&self) -> String {
        let mut html = String::from("<h2>🚀 Personal Projects</h2>");
        for project in &self.projects {
            html.push_str(&format!(
                "<div style=\"{CARD_STYLE}\"><h3>{}</h3><p><strong>{}</strong></p><p>{}</p></div>",
                escape(&project.name),
                escape(&project.period),
                escape(&project.description),
            ));
        }
        html
    }

    fn education_html(&self) -> String {
        let edu = &self.education;
        let mut html = format!(
            "<h2>🎓 Education</h2><h3>{}</h3><p><strong>{}</strong></p><p>Majoring in {}</p><p>Graduated: {} | {}</p>",
            escape(&edu.institution),
            escape(&edu.degree),
            escape(&edu.major),
            escape(&edu.graduation),
            escape(&edu.location),
        );
        html.push_str(&course_list(
            "Computer Science Coursework:",
            &edu.coursework.computer_science,
        ));
        html.push_str(&course_list(
            "Information Systems Coursework:",
            &edu.coursework.information_systems,
        ));
        html
    }

    fn contact_html(&self) -> String {
        let p = &self.personal;
        let email = escape(&p.email);
        let linkedin = escape(&p.linkedin);
        let mut html = format!(
            "<h2>📞 Contact Information</h2><div style=\"margin-bottom: 2rem;\"><h3>{}</h3>\
             <p><strong>Email:</strong> <a href=\"mailto:{email}\" style=\"{LINK_STYLE}\">{email}</a></p>\
             <p><strong>Phone:</strong> {}</p>\
             <p><strong>LinkedIn:</strong> <a href=\"{linkedin}\" target=\"_blank\" style=\"{LINK_STYLE}\">{linkedin}</a></p></div>",
            escape(&p.name),
            escape(&p.phone),
        );
        if !self.referees.is_empty() {
            html.push_str("<h3>Professional References</h3>");
        }
        for r in &self.referees {
            let email = escape(&r.email);
            html.push_str(&format!(
                "<div style=\"{CARD_STYLE}\"><h4>{}</h4><p><strong>{} at {}</strong></p><p>Phone: {}</p>\
                 <p>Email: <a href=\"mailto:{email}\" style=\"{LINK_STYLE}\">{email}</a></p></div>",
                escape(&r.name),
                escape(&r.position),
                escape(&r.company),
                escape(&r.phone),
            ));
        }
        html
    }
}

fn course_list(title: &str, courses: &[String]) -> String {
    if courses.is_empty() {
        return String::new();
    }
    let items: String = courses
        .iter()
        .map(|c| format!("<li>{}</li>", escape(c)))
        .collect();
    format!("<h3>{title}</h3><ul>{items}</ul>")
}

fn is_web_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

/// Goes after `mailto:`, so no scheme separator or whitespace
fn is_plain_email(email: &str) -> bool {
    email.contains('@') && !email.contains(':') && !email.chars().any(char::is_whitespace)
}

/// Escape text for use inside element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
