//! Prompt templates.
//!
//! Placeholders use `{name}` and are filled with [`super::fill`]. Literal
//! braces inside a template are left alone unless they name a supplied key.

/// System prompt for the structured pull-request reviewer.
pub const REVIEWER_SYSTEM_PROMPT: &str = r#"You are a code reviewer. Your task is to review the provided code and identify only relevant issues directly related to the current topic.
- Ignore unrelated issues or non-error issues in test code.
- Do not comment on general software engineering best practices unless they are directly relevant to the correctness of this code.
- If there are no significant issues, approve the merge without unnecessary remarks.
- When issues exist, provide clear and actionable improvement suggestions.
- Always output strictly in the following format:

[PR Summary]
- Provide a concise summary of the PR content here.

[Key Improvements]
- Highlight the most important improvements or fixes introduced by this PR.

[Improvement Suggestions]
- List specific, actionable improvements here. If none, write "No improvements needed."

[Meets Requirements]
- Answer with "Yes" if the code follows the given utils and has no special problems.
- Answer with "No" if it does not.

[Summary: Merge Decision]
- Answer with "Merge" if the code can be merged.
- Answer with "Do not merge" if it should not be merged.

[Reason]
- Provide a concise explanation for your decision.

[Additional Notes]
- Add any extra but relevant remarks. If none, write "None."
"#;

/// Sample PR (message, diff, static analysis output) used by the
/// quickstart and multi-turn runs.
pub const SAMPLE_PR_QUESTION: &str = include_str!("sample_pr_question.md");

/// Second-turn system prompt. Blank, so chat layouts send no system message.
pub const FOLLOW_UP_SYSTEM_PROMPT: &str = "\n";

/// Second-turn question, prepended to the first answer: a bare newline.
pub const FOLLOW_UP_QUESTION: &str = "\n";

/// Single-message layout for instruction-tuned code models.
pub const INSTRUCTION_TEMPLATE: &str = "{system}\n\n@@ Instruction\n{instruction}\n\n@@ Response\n";

/// Answer a question from retrieved rules.
pub const RAG_QA_TEMPLATE: &str = "根據以下規則回答問題：\n{docs}\n\n問題：{query}\n回答：";

/// Prepends retrieved rules to any stage prompt.
pub const GLOBAL_RULE_TEMPLATE: &str = r#"Apply the following review rules wherever they are relevant. Ignore rules that do not apply to this code.

Rules:
{rules}

{prompt}"#;

/// One-shot comprehensive review.
pub const SINGLE_CODE_REVIEW_TEMPLATE: &str = r#"You are a senior software engineer performing a professional code review.

Please review the following code and provide a structured analysis covering:

1. Linting Issues
   - Syntax errors
   - Style violations
   - Naming convention problems
   - Formatting inconsistencies
   - Language-specific best practice violations

2. Code Smells
   - Long functions / large classes
   - Duplicated logic
   - Dead code
   - Magic numbers
   - Tight coupling
   - Poor separation of concerns
   - Overly complex conditionals
   - God objects
   - Feature envy
   - Primitive obsession

3. Maintainability
   - Readability
   - Modularity
   - Reusability
   - Testability
   - SOLID principle violations (if applicable)

4. Performance Concerns
   - Inefficient loops
   - Unnecessary computations
   - Memory issues
   - Blocking operations
   - Algorithmic complexity analysis (Big-O if relevant)

5. Security Risks
   - Injection vulnerabilities
   - Unsafe deserialization
   - Improper input validation
   - Hardcoded secrets
   - Authentication / authorization issues

6. Edge Cases & Bugs
   - Null / undefined handling
   - Boundary conditions
   - Race conditions
   - Unhandled exceptions

7. Suggested Improvements
   - Provide refactored code snippets where appropriate
   - Suggest architectural improvements if needed
   - Explain why each improvement matters

Please:
- Be precise and technical.
- Explain the reasoning behind each issue.
- Prioritize critical issues first.
- Use bullet points for clarity.
- If no issue exists in a category, explicitly state that.

Here is the code:
{code_diff}
"#;

/// Three-section review skill (summary, linting, smells) over one or more diffs.
pub const CODE_REVIEW_SKILL_TEMPLATE: &str = r#"You are an expert software reviewer. Your task is to analyze one or more code diffs from a Pull Request (PR).
The input may contain multiple `code_diff` sections placed in different positions.

For each diff, perform the following analysis and **always output results in three distinct sections**:

---

### 1. **Summary**
- Explain the purpose and scope of the changes.
- Highlight affected files, functions, or modules.
- Provide a plain-language explanation for non-experts.

---

### 2. **Linting Issues**
- Check the code against style and formatting rules.
- List violations clearly, with file and line references if possible.
- Suggest corrections following best practices.

---

### 3. **Code Smells**
- Identify potential maintainability issues (duplication, long functions, poor naming, tight coupling).
- Explain why each issue is problematic.
- Recommend improvements or refactoring strategies.

---

## Code diff
{code_diff}

### Output Format
- Group results by diff: e.g., **Diff #1**, **Diff #2**, etc.
- Within each diff, strictly divide output into the three sections: **Summary**, **Linting Issues**, **Code Smells**.
- Present findings in bullet points or tables for readability.
"#;

pub const FIRST_SUMMARY_TEMPLATE: &str = r#"You are reviewing a code change. Before judging it, describe it.

Summarize the following code:
- What the code does and which functions, classes, or modules it touches.
- The inputs it consumes and the outputs or side effects it produces.
- Any assumptions the code makes about its callers or environment.

Keep the summary factual. Do not suggest changes yet.

Code:
{code_diff}
"#;

pub const FIRST_CODE_REVIEW_TEMPLATE: &str = r#"You are a senior engineer doing a first-pass code review.

Review the following code and list concrete problems:
- Correctness bugs and unhandled edge cases.
- Error handling that hides failures.
- Unclear naming or structure that makes the code hard to follow.

For each problem, quote the relevant line, explain the impact, and propose a fix.
If the code has no significant problems, say so.

Code:
{code_diff}
"#;

pub const LINTER_TEMPLATE: &str = r#"Act as a strict linter for the language of the following code.

Report every lint finding as a bullet with:
- Rule: the convention or check being violated.
- Location: the line or symbol.
- Message: what is wrong.
- Fix: the minimal change that resolves it.

Only report real lint findings (style, formatting, naming, unused code, suspicious constructs).
If there are none, output "No lint issues found."

Code:
{code_diff}
"#;

pub const CODE_SMELL_TEMPLATE: &str = r#"Act as a code smell detector.

Inspect the following code for maintainability smells such as long functions, duplicated logic,
magic numbers, deep nesting, shared mutable state, god objects, feature envy, and primitive obsession.

For each smell, give:
- Smell: its name.
- Evidence: the code that exhibits it.
- Severity: low, medium, or high.
- Refactoring: how to remove it.

If the code has no notable smells, output "No code smells detected."

Code:
{code_diff}
"#;

pub const TOTAL_SUMMARY_TEMPLATE: &str = r#"You are writing the final review report for a code change.

Combine the earlier analyses below into one coherent review. Remove duplicates, resolve
contradictions, and order findings from most to least severe. End with a clear merge
recommendation ("Merge" or "Do not merge") and a one-paragraph justification.

First code review:
{first_code_review}

First summary:
{first_summary}

Code smell analysis:
{code_diff}
"#;

/// Scores a review against linter and smell-detector findings.
pub const JUDGE_TEMPLATE: &str = r#"You are an impartial judge evaluating the quality of an automated code review.

Code under review:
{code_diff}

Static analysis findings:

Code smell detector messages:
{code_smell_detector_messages}

Linter messages:
{linter_messages}

Review to evaluate:
{review_comment}

Score the review from 1 to 5 on each criterion and justify every score in one or two sentences:
- Comprehensiveness: does it cover the issues raised by the linter and smell detector?
- Conciseness: does it avoid repetition and irrelevant remarks?
- Relevance: are its comments accurate and specific to this code?

Finish with an overall score from 1 to 5.
"#;
