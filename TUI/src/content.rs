//! Portfolio copy: profile, projects, experience, skills and services.

use reqwest::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectCategory {
    Frontend,
    Mobile,
    Erp,
    Backend,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 4] = [
        ProjectCategory::Frontend,
        ProjectCategory::Mobile,
        ProjectCategory::Erp,
        ProjectCategory::Backend,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProjectCategory::Frontend => "Frontend",
            ProjectCategory::Mobile => "Mobile",
            ProjectCategory::Erp => "ERP",
            ProjectCategory::Backend => "Backend",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillCategory {
    Core,
    Frameworks,
    Backend,
    Tools,
}

impl SkillCategory {
    pub fn label(self) -> &'static str {
        match self {
            SkillCategory::Core => "Core",
            SkillCategory::Frameworks => "Frameworks",
            SkillCategory::Backend => "Backend",
            SkillCategory::Tools => "Tools",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Project {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub category: ProjectCategory,
    pub link: Option<&'static str>,
}

impl Project {
    /// Case-insensitive substring match against tags and category.
    pub fn matches(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            || self.category.label().to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Experience {
    pub id: &'static str,
    pub company: &'static str,
    pub position: &'static str,
    pub period: &'static str,
    pub responsibilities: &'static [&'static str],
    pub skills: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct Skill {
    pub name: &'static str,
    pub level: u8,
    pub category: SkillCategory,
    pub relevance: &'static str,
    /// Filter applied to the project archive when the skill is selected.
    pub filter: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Service {
    pub title: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
}

/// Direct WhatsApp channel, opened with a prefilled greeting.
pub struct WhatsApp {
    pub number: &'static str,
    pub base_url: &'static str,
    pub message: &'static str,
}

impl WhatsApp {
    /// `wa.me` link without the greeting, short enough to print.
    pub fn short_url(&self) -> String {
        format!("{}/{}", self.base_url, self.number)
    }

    /// Full link with the greeting as the `text` query parameter.
    pub fn chat_url(&self) -> String {
        let base = self.short_url();
        match Url::parse_with_params(&base, &[("text", self.message)]) {
            Ok(url) => url.to_string(),
            Err(_) => base,
        }
    }
}

pub struct Profile {
    pub name: &'static str,
    pub title: &'static str,
    pub tagline: &'static str,
    pub summary: &'static [&'static str],
    pub linkedin: &'static str,
    pub whatsapp: WhatsApp,
}

pub const PROFILE: Profile = Profile {
    name: "Snehal Sukhadeve",
    title: "Senior Software Developer",
    tagline: "Enterprise systems, mobile apps and AI integration.",
    summary: &[
        "Senior Software Developer with 2+ years building enterprise platforms: HR, CRM, litigation and travel management.",
        "Works across React, React Native and the Frappe framework, deploys on AWS and automates workflows with n8n.",
        "Integrates AI agents and models such as Gemini into day-to-day products and developer tooling.",
    ],
    linkedin: "https://www.linkedin.com/in/snehal-sukhadeve-2980551a2/",
    whatsapp: WhatsApp {
        number: "919765179473",
        base_url: "https://wa.me",
        message: "Hi Snehal, I just visited your portfolio and would like to discuss a high-impact project.",
    },
};

pub const PROJECTS: &[Project] = &[
    Project {
        id: "1",
        title: "Human Resource (HR) System",
        description: "A comprehensive HR management platform handling employee lifecycle, payroll, and performance tracking.",
        tags: &["Frappe", "React", "Python", "MariaDB"],
        category: ProjectCategory::Erp,
        link: Some("#"),
    },
    Project {
        id: "2",
        title: "Litigation Management System (LMS)",
        description: "A specialized legal tech solution for tracking cases, hearings, and legal documentation efficiently.",
        tags: &["React", "Node.js", "AWS", "Security"],
        category: ProjectCategory::Erp,
        link: None,
    },
    Project {
        id: "3",
        title: "Travel Management System (TMS)",
        description: "An end-to-end travel booking and expense management system for corporate travel needs.",
        tags: &["React", "Frappe", "REST API", "Maps Integration"],
        category: ProjectCategory::Erp,
        link: None,
    },
    Project {
        id: "4",
        title: "HR Android App",
        description: "A mobile companion for the HR system, allowing employees to mark attendance and view payslips on the go.",
        tags: &["React Native", "Mobile", "Android", "API"],
        category: ProjectCategory::Mobile,
        link: None,
    },
];

pub const EXPERIENCES: &[Experience] = &[
    Experience {
        id: "e1",
        company: "TechBird IT Services Pvt Ltd",
        position: "Software Engineer",
        period: "Oct 2023 - Present",
        responsibilities: &[
            "Leading development of core enterprise modules including HR, CRM, and Litigation Management Systems.",
            "Architecting scalable cloud solutions on AWS for high-availability enterprise applications.",
        ],
        skills: &["React", "Frappe", "AWS", "AI Integration"],
    },
    Experience {
        id: "e2",
        company: "PrepForTech",
        position: "Full Stack Developer (Internship)",
        period: "Apr 2022 - Sep 2023",
        responsibilities: &[
            "Developed robust web applications using React.js and Java, ensuring seamless user experiences.",
            "Collaborated with cross-functional teams to deliver robust full-stack solutions.",
        ],
        skills: &["React.js", "Java", "React Native", "JavaScript", "Python"],
    },
];

pub const SKILLS: &[Skill] = &[
    Skill {
        name: "Modern Web",
        level: 95,
        category: SkillCategory::Frameworks,
        relevance: "Expertise in React.js, React Native, and Frappe Framework for full-stack excellence.",
        filter: "React",
    },
    Skill {
        name: "AI & Automation",
        level: 90,
        category: SkillCategory::Tools,
        relevance: "Leveraging Gemini Flash, Trae, Antigravity, and n8n for next-gen development.",
        filter: "API",
    },
    Skill {
        name: "Cloud Infrastructure",
        level: 85,
        category: SkillCategory::Backend,
        relevance: "Deploying and managing scalable applications using AWS services.",
        filter: "AWS",
    },
    Skill {
        name: "Dev Tools",
        level: 88,
        category: SkillCategory::Tools,
        relevance: "Proficient with Cursor, ChatGPT, Hugging Face, and modern CI/CD workflows.",
        filter: "Node.js",
    },
    Skill {
        name: "Mobile Development",
        level: 92,
        category: SkillCategory::Frameworks,
        relevance: "Building performant Android/iOS apps with React Native.",
        filter: "Mobile",
    },
    Skill {
        name: "Enterprise Systems",
        level: 90,
        category: SkillCategory::Core,
        relevance: "Deep experience with HR, CRM, LMS, and TMS architectures.",
        filter: "ERP",
    },
];

pub const SERVICES: &[Service] = &[
    Service {
        title: "Enterprise Solutions",
        description: "Building robust HR, CRM, and LMS systems using Frappe and React for streamlined business operations.",
        tags: &["HR Tech", "CRM", "LMS"],
    },
    Service {
        title: "AI-Driven Development",
        description: "Integrating cutting-edge AI models like Gemini Flash and tools like Trae & Cursor into workflows.",
        tags: &["Gemini Flash", "Trae", "Antigravity"],
    },
    Service {
        title: "Mobile Engineering",
        description: "Developing native-quality Android applications for workforce management and HR systems.",
        tags: &["React Native", "Android", "iOS"],
    },
    Service {
        title: "Cloud & Automation",
        description: "Deploying scalable architectures on AWS and automating workflows using n8n.",
        tags: &["AWS", "n8n", "DevOps"],
    },
];

/// Prompts offered when the chat is empty.
pub const EXAMPLE_PROMPTS: &[&str] = &[
    "What's Snehal's approach to Micro-frontends?",
    "Tell me about her Java backend expertise.",
    "Explain her experience with Frappe ERP.",
    "Has she built FinTech applications before?",
    "What leadership roles has she held?",
    "Tell me about a high-performance system she built.",
    "How does she bridge Frontend and Java Backends?",
    "What is her experience with React Native?",
];

const TAG_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Frappe", "Full-stack web framework based on Python & MariaDB, optimized for ERP systems."),
    ("React", "Industry-standard UI library for building complex, reactive web interfaces."),
    ("Python", "High-level programming language used for backend logic and data processing."),
    ("Redis", "In-memory data structure store, used as a database, cache, and message broker."),
    ("React Native", "Framework for building native mobile apps using React and JavaScript."),
    ("TypeScript", "Strongly typed programming language that builds on JavaScript for better scale."),
    ("Node.js", "JavaScript runtime built on Chrome's V8 engine for scalable network apps."),
    ("Firebase", "Platform developed by Google for creating mobile and web applications."),
    ("D3.js", "Powerful JavaScript library for producing dynamic, interactive data visualizations."),
    ("Java", "Robust, object-oriented language for mission-critical enterprise systems."),
    ("Spring Boot", "Framework designed to simplify the bootstrapping and development of new Spring apps."),
    ("Docker", "Platform for developing, shipping, and running applications in containers."),
    ("Kubernetes", "Open-source system for automating deployment, scaling, and management of containers."),
    ("OAuth2", "Industry-standard protocol for authorization and secure identity management."),
];

const GENERIC_TAG_DESCRIPTION: &str = "Core technology used in this architecture.";

/// One-line explanation shown next to a highlighted project tag.
pub fn tag_description(tag: &str) -> &'static str {
    TAG_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == tag)
        .map_or(GENERIC_TAG_DESCRIPTION, |(_, desc)| *desc)
}

/// Tags of the listed projects, card by card, in display order.
pub fn listed_tags(filter: Option<&str>) -> Vec<&'static str> {
    filter_projects(filter, None)
        .into_iter()
        .flat_map(|p| p.tags.iter().copied())
        .collect()
}

pub fn filter_projects(filter: Option<&str>, limit: Option<usize>) -> Vec<&'static Project> {
    let matched = PROJECTS
        .iter()
        .filter(|p| filter.map_or(true, |f| p.matches(f)));
    match limit {
        Some(n) => matched.take(n).collect(),
        None => matched.collect(),
    }
}

/// Persona and ground rules sent with every chat request.
pub fn system_instruction() -> String {
    let skills: Vec<&str> = SKILLS.iter().map(|s| s.name).collect();
    format!(
        "You are the AI career assistant for {name}, a {title} with 2+ years of experience.\n\
         {name}'s skills: {skills}.\n\
         {name}'s background: {summary}\n\
         Your tone: professional, slightly witty, confident, and elite.\n\
         Your goal: answer questions about {name}'s professional journey, skills, and projects based on the portfolio data.\n\
         If you don't know an answer, direct them to the LinkedIn profile ({linkedin}) or the contact form.",
        name = PROFILE.name,
        title = PROFILE.title,
        skills = skills.join(", "),
        summary = PROFILE.summary.join(" "),
        linkedin = PROFILE.linkedin,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(projects: &[&Project]) -> Vec<&'static str> {
        projects.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_no_filter_returns_everything() {
        assert_eq!(filter_projects(None, None).len(), PROJECTS.len());
        assert_eq!(ids(&filter_projects(None, Some(2))), vec!["1", "2"]);
    }

    #[test]
    fn test_filter_matches_tags_case_insensitively() {
        assert_eq!(ids(&filter_projects(Some("frappe"), None)), vec!["1", "3"]);
        // "React" is a substring of "React Native".
        assert_eq!(ids(&filter_projects(Some("REACT"), None)), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_filter_matches_category() {
        assert_eq!(ids(&filter_projects(Some("mobile"), None)), vec!["4"]);
        assert_eq!(ids(&filter_projects(Some("erp"), None)), vec!["1", "2", "3"]);
        assert!(filter_projects(Some("kubernetes"), None).is_empty());
    }

    #[test]
    fn test_every_skill_filter_finds_work() {
        for skill in SKILLS {
            assert!(
                !filter_projects(Some(skill.filter), None).is_empty(),
                "{} has no matching projects",
                skill.name
            );
        }
    }

    #[test]
    fn test_tag_descriptions_fall_back_to_generic() {
        assert!(tag_description("Frappe").contains("ERP"));
        assert_eq!(tag_description("Maps Integration"), GENERIC_TAG_DESCRIPTION);
    }

    #[test]
    fn test_listed_tags_follow_the_filter() {
        let mobile = listed_tags(Some("mobile"));
        assert_eq!(mobile, PROJECTS[3].tags.to_vec());
        assert_eq!(
            listed_tags(None).len(),
            PROJECTS.iter().map(|p| p.tags.len()).sum::<usize>()
        );
    }

    #[test]
    fn test_whatsapp_links() {
        let wa = &PROFILE.whatsapp;
        assert_eq!(wa.short_url(), "https://wa.me/919765179473");
        assert!(wa
            .chat_url()
            .starts_with("https://wa.me/919765179473?text=Hi+Snehal%2C+I+just+visited"));
    }

    #[test]
    fn test_system_instruction_names_the_person() {
        let text = system_instruction();
        assert!(text.contains(PROFILE.name));
        assert!(text.contains("Modern Web"));
    }
}
