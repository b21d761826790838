//! Prompt templates for the external provider. Kept short on purpose: CV
//! text and descriptions are truncated by the callers to stay inside the
//! model context window.

/// Builds the CV analysis prompt. The model must answer with the JSON shape
/// shown in the example; the caller deserializes leniently and falls back to
/// the local heuristic on any deviation.
pub fn cv_analysis_prompt(cv_text: &str, job_description: &str, skills: &[String]) -> String {
    format!(
        r#"Analysez ce CV et donnez un score sur 100 pour le poste.

CV (extrait): {cv_text}

Poste: {job_description}
Compétences: {skills}

Répondez en JSON:
{{
  "score": 75,
  "skills": ["JavaScript", "React"],
  "experience": "2 ans",
  "education": "Master",
  "projects": ["App web"],
  "languages": ["Français"],
  "recommendations": ["Plus de projets"],
  "experienceLevel": "Mid-level"
}}"#,
        skills = skills.join(", "),
    )
}

/// Builds the technical test generation prompt: 10 multiple-choice questions,
/// 4 options each, calibrated to the job title, skills and experience level.
pub fn test_generation_prompt(job_title: &str, skills: &[String], level: &str) -> String {
    format!(
        r#"Générez 10 questions QCM pour un test technique pour le poste: {job_title}
Compétences: {skills}
Niveau: {level}

Format JSON:
{{
  "questions": [
    {{
      "question": "Qu'est-ce que JavaScript?",
      "options": ["Langage de programmation", "Base de données", "Serveur web", "Système d'exploitation"],
      "correctAnswer": 0
    }}
  ]
}}"#,
        skills = skills.join(", "),
    )
}
