// All LLM prompt constants for the tailoring tasks.
// Placeholders are filled by prompt_builder in a single pass, so profile and
// job description text is never scanned for placeholders.

pub const ABOUT_ME_SYSTEM: &str = "You are an expert resume writer who creates compelling, \
    ATS-optimized professional summaries.";

/// Replace: {experience_summary}, {skills}, {interests}, {style_instruction}, {job_description}
pub const ABOUT_ME_TEMPLATE: &str = r#"Write a professional summary for a resume. The candidate is applying to this role:

{job_description}

Candidate's Background:
{experience_summary}

Key Skills: {skills}

Additional Background/Interests:
{interests}

Write a 3-4 sentence professional summary that highlights relevant experience and skills for this role. If any interests or background align with the role, mention them naturally. Be specific and genuine. Avoid cliches and corporate jargon. Keep it natural and straightforward.

{style_instruction}

Generate only the summary text."#;

pub const SELECTION_SYSTEM: &str = "You are an expert at analyzing job relevance for \
    resume optimization. Return only valid JSON.";

/// Replace: {experiences}, {json_only}, {job_description}
pub const SELECTION_TEMPLATE: &str = r#"You are a resume optimization expert. Rank each job experience by relevance to THIS SPECIFIC job posting.

User's Job Experience:
{experiences}

TARGET JOB DESCRIPTION (ANALYZE CAREFULLY):
{job_description}

CRITICAL ANALYSIS CRITERIA:
1. Skills Match: How closely do the role's responsibilities match the required skills?
2. Industry Alignment: Is it the same or a related industry?
3. Role Similarity: How similar are the title and level to the target position?
4. Seniority and Recency: How recent and how senior is the experience?

Instructions:
- Rank ALL experiences, most relevant first
- Use the experience ids shown above
- Return a JSON array of ids in order of relevance, like: [2, 1, 4, 3]

{json_only}"#;

pub const DUTIES_SYSTEM: &str = "You are an expert resume writer who creates impactful, \
    ATS-optimized bullet points.";

/// Replace: {title}, {company}, {duties}, {max_duties}, {style_instruction}, {job_description}
pub const DUTIES_TEMPLATE: &str = r#"Rewrite these job duties to be relevant for this job application:

Job: {title} at {company}

Current Duties:
{duties}

Target Job:
{job_description}

Select the {max_duties} most relevant duties and rewrite them to:
- Be specific and quantifiable where possible
- Show real impact and results
- Use clear, direct language
- Match terminology from the job posting naturally
- Use ONLY facts present in the duties above

{style_instruction}

Return only the bullet points, one per line, starting with "•"."#;

pub const SKILLS_SYSTEM: &str = "You are an expert at creating tailored, ATS-optimized \
    skills sections for resumes.";

/// Replace: {skills}, {experience_context}, {max_skills}, {job_description}
pub const SKILLS_TEMPLATE: &str = r#"You are a resume optimization expert. Create a tailored skills section for this specific job posting.

User's Current Skills:
{skills}

User's Experience Context:
{experience_context}

TARGET JOB DESCRIPTION (ANALYZE CAREFULLY):
{job_description}

INSTRUCTIONS:
1. Select skills from the user's skills and experience that directly match the job requirements
2. Prioritize skills named in the job description, using its exact terminology
3. Include both technical and soft skills, keeping each name to 1-4 words
4. Only include skills that are realistic given the experience above
5. Return at most {max_skills} skills, most relevant first

Format: return ONLY a comma-separated list of skills. No bullet points, no numbering, no explanations.
Example: Python, JavaScript, Team Leadership, API Development"#;
