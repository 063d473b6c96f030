// Recommendation prompt template.

pub const RECOMMEND_PROMPT: &str = "\
You are a smart job recommendation assistant.
Given the following user profile and a list of job postings, suggest the most relevant ones.

User Profile:
{user_profile}

Job Postings:
{job_listings}

Return a short, clear, and helpful recommendation list including:
- Job Title
- Why it's a good fit
- URL";
