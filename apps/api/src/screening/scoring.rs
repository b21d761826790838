//! CV scoring — pluggable, trait-based scorer that measures a candidate's CV
//! against a job offer's required skills.
//!
//! Default: `HeuristicCvScorer` (pure-Rust, deterministic, fully testable).
//! Optional: `AiCvScorer` (external provider via `AiClient`), which falls back
//! to the heuristic on any provider error — a caller can never fail to obtain
//! an analysis.
//!
//! `AppState` holds an `Arc<dyn CvScorer>`, swapped at startup via config.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai_client::prompts::cv_analysis_prompt;
use crate::ai_client::AiClient;

/// Maximum CV characters forwarded to the external provider, to keep the
/// request inside the model context window.
const AI_CV_TEXT_LIMIT: usize = 2000;
const AI_DESCRIPTION_LIMIT: usize = 500;
const AI_SKILLS_LIMIT: usize = 5;
const AI_SCORING_TEMPERATURE: f32 = 0.3;

/// Experience bracket inferred from the CV. Serialized labels match the
/// stored analysis payloads ("Mid-level", not "MidLevel").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[default]
    Junior,
    #[serde(rename = "Mid-level")]
    MidLevel,
    Senior,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::MidLevel => "Mid-level",
            ExperienceLevel::Senior => "Senior",
        }
    }
}

/// Structured result of analyzing one CV against one job offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvAnalysis {
    /// Fit score, 0–100.
    pub score: i32,
    /// Required skills found verbatim in the CV text.
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub projects: Vec<String>,
    pub languages: Vec<String>,
    pub recommendations: Vec<String>,
    pub experience_level: ExperienceLevel,
}

// Keyword tables for the point-accumulation heuristic. The CV corpus is
// French, hence the French keywords. Fixed, read-only, loaded once.
const EXPERIENCE_KEYWORDS: &[&str] = &["expérience", "ans", "année", "stage", "emploi"];
const EDUCATION_KEYWORDS: &[&str] = &["diplôme", "master", "licence", "université", "école"];
const PROJECT_KEYWORDS: &[&str] = &["projet", "développé", "créé", "application"];
const STRUCTURE_KEYWORDS: &[&str] = &["compétences", "expérience", "formation"];

const SENIOR_EXPERIENCE_HITS: usize = 6;
const MID_EXPERIENCE_HITS: usize = 3;

fn keyword_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

/// Deterministic point-accumulation heuristic:
///
/// - skills ≤ 40 pts: `min(40 / max(n, 1), 8)` per required skill found
///   verbatim (case-insensitive) in the CV text;
/// - experience ≤ 30 pts: distinct experience-keyword hits × 6;
/// - education ≤ 15 pts: distinct education-keyword hits × 5;
/// - projects ≤ 10 pts: distinct project-keyword hits × 3;
/// - structure ≤ 5 pts: distinct section-keyword hits × 2.
///
/// Total rounded then clamped to [0, 100]. Same inputs, same output. An empty
/// CV text (e.g. unreadable file) produces a low but valid score.
pub fn analyze_cv(cv_text: &str, job_skills: &[String]) -> CvAnalysis {
    let text = cv_text.to_lowercase();
    let mut score = 0.0_f64;

    // Skills component (≤ 40 pts, capped at 8 per skill)
    let per_skill = (40.0 / job_skills.len().max(1) as f64).min(8.0);
    let mut found_skills = Vec::new();
    for skill in job_skills {
        if text.contains(&skill.to_lowercase()) {
            found_skills.push(skill.clone());
            score += per_skill;
        }
    }

    let experience_hits = keyword_hits(&text, EXPERIENCE_KEYWORDS);
    score += (experience_hits * 6).min(30) as f64;

    let education_hits = keyword_hits(&text, EDUCATION_KEYWORDS);
    score += (education_hits * 5).min(15) as f64;

    let project_hits = keyword_hits(&text, PROJECT_KEYWORDS);
    score += (project_hits * 3).min(10) as f64;

    let structure_hits = keyword_hits(&text, STRUCTURE_KEYWORDS);
    score += (structure_hits * 2).min(5) as f64;

    let experience_level = if text.contains("senior") || experience_hits > SENIOR_EXPERIENCE_HITS {
        ExperienceLevel::Senior
    } else if experience_hits > MID_EXPERIENCE_HITS {
        ExperienceLevel::MidLevel
    } else {
        ExperienceLevel::Junior
    };

    let mut recommendations = Vec::new();
    if found_skills.len() < 2 {
        recommendations.push("Ajouter plus de compétences".to_string());
    }
    if project_hits < 1 {
        recommendations.push("Détailler vos projets".to_string());
    }

    CvAnalysis {
        score: (score.round() as i32).clamp(0, 100),
        skills: if found_skills.is_empty() {
            vec!["Compétence non détectée".to_string()]
        } else {
            found_skills
        },
        experience: if experience_hits > 0 {
            "Expérience détectée".to_string()
        } else {
            "Peu d'expérience".to_string()
        },
        education: if education_hits > 0 {
            "Formation identifiée".to_string()
        } else {
            "Formation non spécifiée".to_string()
        },
        projects: if project_hits > 0 {
            vec!["Projets mentionnés".to_string()]
        } else {
            vec![]
        },
        languages: if text.contains("anglais") {
            vec!["Français".to_string(), "Anglais".to_string()]
        } else {
            vec!["Français".to_string()]
        },
        recommendations,
        experience_level,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The CV scorer trait. Implement this to swap backends without touching the
/// submission handler.
///
/// The signature is infallible on purpose: an application must never be
/// blocked because a scorer errored, so every backend is required to resolve
/// to some analysis (the AI backend does so by falling back to the heuristic).
#[async_trait]
pub trait CvScorer: Send + Sync {
    async fn score(&self, cv_text: &str, job_description: &str, job_skills: &[String])
        -> CvAnalysis;
}

/// Deterministic local scorer. Fast, no network, never fails.
pub struct HeuristicCvScorer;

#[async_trait]
impl CvScorer for HeuristicCvScorer {
    async fn score(
        &self,
        cv_text: &str,
        _job_description: &str,
        job_skills: &[String],
    ) -> CvAnalysis {
        analyze_cv(cv_text, job_skills)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AI-backed scorer
// ────────────────────────────────────────────────────────────────────────────

/// Raw provider payload. Every field is defaulted so a partially valid
/// response still yields a usable analysis.
#[derive(Debug, Deserialize)]
struct AiAnalysisPayload {
    #[serde(default)]
    score: i64,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    experience: String,
    #[serde(default)]
    education: String,
    #[serde(default)]
    projects: Vec<String>,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(rename = "experienceLevel", default)]
    experience_level: ExperienceLevel,
}

/// External-provider scorer. Attempts one bounded AI call; any error (HTTP,
/// timeout, unparsable output) falls back to [`analyze_cv`] so the contract
/// stays infallible.
pub struct AiCvScorer {
    client: AiClient,
}

impl AiCvScorer {
    pub fn new(client: AiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CvScorer for AiCvScorer {
    async fn score(
        &self,
        cv_text: &str,
        job_description: &str,
        job_skills: &[String],
    ) -> CvAnalysis {
        let prompt = cv_analysis_prompt(
            truncate_chars(cv_text, AI_CV_TEXT_LIMIT),
            truncate_chars(job_description, AI_DESCRIPTION_LIMIT),
            &job_skills[..job_skills.len().min(AI_SKILLS_LIMIT)],
        );

        match self
            .client
            .call_json::<AiAnalysisPayload>(&prompt, AI_SCORING_TEMPERATURE)
            .await
        {
            Ok(payload) => CvAnalysis {
                score: payload.score.clamp(0, 100) as i32,
                skills: payload.skills,
                experience: payload.experience,
                education: payload.education,
                projects: payload.projects,
                languages: payload.languages,
                recommendations: payload.recommendations,
                experience_level: payload.experience_level,
            },
            Err(e) => {
                warn!("AI CV analysis failed, using local heuristic: {e}");
                analyze_cv(cv_text, job_skills)
            }
        }
    }
}

/// Truncates to at most `limit` characters on a char boundary.
fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_score_is_bounded_and_deterministic() {
        let cv = "Expérience de 5 ans. Diplôme de master à l'université. \
                  Projet développé: application web. Compétences et formation solides.";
        let required = skills(&["JavaScript", "React"]);
        let first = analyze_cv(cv, &required);
        let second = analyze_cv(cv, &required);
        assert!((0..=100).contains(&first.score));
        assert_eq!(first.score, second.score);
    }

    #[test]
    fn test_skills_component_awards_capped_points_per_match() {
        // 5 required skills → 8 pts each; 2 present in the CV → 16 pts.
        let required = skills(&["JavaScript", "React", "Docker", "AWS", "SQL"]);
        let analysis = analyze_cv("javascript et react uniquement", &required);
        assert_eq!(analysis.score, 16);
        assert_eq!(analysis.skills, vec!["JavaScript", "React"]);
    }

    #[test]
    fn test_per_skill_contribution_is_capped_at_8() {
        // 2 required skills → 40/2 = 20, capped at 8 per skill.
        let required = skills(&["JavaScript", "React"]);
        let analysis = analyze_cv("javascript react", &required);
        assert_eq!(analysis.score, 16);
    }

    #[test]
    fn test_empty_cv_text_scores_zero_without_failing() {
        let analysis = analyze_cv("", &skills(&["JavaScript"]));
        assert_eq!(analysis.score, 0);
        assert_eq!(analysis.skills, vec!["Compétence non détectée"]);
        assert_eq!(analysis.experience, "Peu d'expérience");
        assert_eq!(analysis.experience_level, ExperienceLevel::Junior);
    }

    #[test]
    fn test_experience_component_caps_at_30() {
        // All 5 experience keywords present → min(5 × 6, 30) = 30.
        let cv = "expérience ans année stage emploi";
        let analysis = analyze_cv(cv, &[]);
        // + structure bonus: "expérience" is also a structure keyword (+2).
        assert_eq!(analysis.score, 32);
    }

    #[test]
    fn test_education_component_caps_at_15() {
        let cv = "diplôme master licence université école";
        let analysis = analyze_cv(cv, &[]);
        assert_eq!(analysis.score, 15);
    }

    #[test]
    fn test_projects_and_structure_components() {
        // 4 project keywords → min(12, 10); 3 structure keywords → min(6, 5).
        // "expérience" also counts for the experience component (+6).
        let cv = "projet développé créé application compétences expérience formation";
        let analysis = analyze_cv(cv, &[]);
        assert_eq!(analysis.score, 10 + 5 + 6);
        assert_eq!(analysis.projects, vec!["Projets mentionnés"]);
    }

    #[test]
    fn test_senior_detected_from_keyword() {
        let analysis = analyze_cv("développeur senior", &[]);
        assert_eq!(analysis.experience_level, ExperienceLevel::Senior);
    }

    #[test]
    fn test_mid_level_requires_more_than_three_experience_hits() {
        let analysis = analyze_cv("expérience ans année stage", &[]);
        assert_eq!(analysis.experience_level, ExperienceLevel::MidLevel);

        let junior = analyze_cv("expérience ans année", &[]);
        assert_eq!(junior.experience_level, ExperienceLevel::Junior);
    }

    #[test]
    fn test_recommendations_for_thin_cvs() {
        let analysis = analyze_cv("javascript", &skills(&["JavaScript", "React", "SQL"]));
        assert!(analysis
            .recommendations
            .contains(&"Ajouter plus de compétences".to_string()));
        assert!(analysis
            .recommendations
            .contains(&"Détailler vos projets".to_string()));

        let strong = analyze_cv(
            "javascript react et un projet",
            &skills(&["JavaScript", "React"]),
        );
        assert!(strong.recommendations.is_empty());
    }

    #[test]
    fn test_languages_detection() {
        let analysis = analyze_cv("bilingue anglais", &[]);
        assert_eq!(analysis.languages, vec!["Français", "Anglais"]);
        assert_eq!(analyze_cv("rien", &[]).languages, vec!["Français"]);
    }

    #[test]
    fn test_experience_level_serde_labels() {
        assert_eq!(
            serde_json::to_string(&ExperienceLevel::MidLevel).unwrap(),
            r#""Mid-level""#
        );
        let parsed: ExperienceLevel = serde_json::from_str(r#""Senior""#).unwrap();
        assert_eq!(parsed, ExperienceLevel::Senior);
    }

    #[test]
    fn test_truncate_chars_respects_utf8_boundaries() {
        assert_eq!(truncate_chars("éàü", 2), "éà");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
