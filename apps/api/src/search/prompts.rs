// Search prompt and query templates.

pub const BROWSER_SEARCH_PROMPT: &str = "\
Find recent job postings relevant to the following profile:
- Skills: {skills}
- Experience: {experience}
- Preferred location: {location}
- Job type: {job_type}
Return job title, company, location, and link. Keep it concise.

Format the answer as a JSON array of objects with exactly these keys:
- \"title\": job title and company
- \"url\": link to the posting
- \"content\": location and a one-line summary of the role";

pub const KEYWORD_QUERY: &str = "{job_type} jobs for {skills} in {location} with {experience} experience";
