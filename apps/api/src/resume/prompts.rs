// Resume extraction prompt template.

pub const RESUME_PARSE_PROMPT: &str = r#"You are a resume parsing assistant.
Extract the following details from the resume text below and return ONLY a valid JSON object:
- skills: a comma-separated list of core technical skills
- experience: total years of professional experience (numeric with 'years')
- location: likely city or region of the candidate
- job_type: one of [Full-time, Part-time, Internship, Contract, Remote] if mentioned, else "Not Found"

Resume Text:
{resume_text}

Respond in JSON format only, example:
{
    "skills": "Python, SQL, Machine Learning",
    "experience": "3 years",
    "location": "San Francisco",
    "job_type": "Full-time"
}"#;
