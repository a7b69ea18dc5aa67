//! Built-in review rule corpus.

use coderag_types::retrieval::{RuleCategory, RuleDocument};

const RULES: &[(RuleCategory, &str)] = &[
    (
        RuleCategory::MutableState,
        "Avoid using mutable default arguments in function definitions, such as lists or dictionaries.\n\
In Python, default arguments are evaluated only once at function definition time, not each time\n\
the function is called. This can cause unexpected shared state between function calls.\n\
Instead, use None as the default value and create the mutable object inside the function.",
    ),
    (
        RuleCategory::MutableState,
        "Be careful with shared mutable state at the module or class level.\n\
Global lists, dictionaries, or class attributes that are mutated can introduce hidden coupling\n\
between different parts of the code and make behavior difficult to reason about or test.\n\
Prefer passing state explicitly or encapsulating it in well-defined objects.",
    ),
    (
        RuleCategory::MutableState,
        "Avoid modifying input arguments unless it is clearly documented and expected.\n\
Functions that mutate their inputs can lead to surprising side effects for callers.\n\
If mutation is required for performance reasons, document it clearly or return a new value instead.",
    ),
    (
        RuleCategory::ControlFlow,
        "Avoid deeply nested conditional logic, as it reduces readability and increases cognitive load.\n\
Deep nesting often indicates that the function is doing too much or missing early returns.\n\
Refactor complex conditionals into smaller functions or use guard clauses to simplify control flow.",
    ),
    (
        RuleCategory::ControlFlow,
        "Do not rely on implicit truthiness for complex objects or return values.\n\
Explicit comparisons improve readability and reduce the risk of subtle bugs,\n\
especially when dealing with empty containers, zero values, or None.",
    ),
    (
        RuleCategory::ControlFlow,
        "Avoid catching broad exceptions such as `except Exception:` unless absolutely necessary.\n\
Catching broad exceptions can hide real bugs and make debugging difficult.\n\
Catch specific exception types and handle them intentionally.",
    ),
    (
        RuleCategory::InterfaceDesign,
        "Functions and methods should have a single, clear responsibility.\n\
If a function performs validation, transformation, and I/O at the same time,\n\
it becomes harder to test and reuse. Split responsibilities into smaller, focused functions.",
    ),
    (
        RuleCategory::InterfaceDesign,
        "Design function interfaces to be explicit and predictable.\n\
Avoid functions whose behavior changes significantly based on hidden flags,\n\
global variables, or implicit context. Prefer explicit parameters and clear return values.",
    ),
    (
        RuleCategory::InterfaceDesign,
        "Avoid returning different types from the same function depending on conditions.\n\
Inconsistent return types increase the burden on callers and are a common source of runtime errors.",
    ),
    (
        RuleCategory::Performance,
        "Avoid unnecessary work inside loops, especially repeated computations or I/O operations.\n\
Move invariant calculations outside loops and cache results when appropriate\n\
to improve performance and readability.",
    ),
    (
        RuleCategory::Performance,
        "Be cautious when using list comprehensions or generator expressions for side effects.\n\
They are intended for building collections, not for executing logic.\n\
Use explicit loops when side effects are required.",
    ),
    (
        RuleCategory::Performance,
        "Avoid premature optimization, but be aware of obvious performance pitfalls,\n\
such as quadratic loops over large data sets or repeated conversions inside hot paths.",
    ),
    (
        RuleCategory::Readability,
        "Prefer clear and descriptive variable and function names over short or ambiguous ones.\n\
Names should reflect intent, not implementation details, to make the code self-explanatory.",
    ),
    (
        RuleCategory::Readability,
        "Avoid magic numbers and hard-coded constants scattered throughout the code.\n\
Use named constants or configuration values to improve readability and maintainability.",
    ),
    (
        RuleCategory::Readability,
        "Comments should explain why the code exists, not what it does.\n\
If the code requires extensive comments to explain basic logic,\n\
it may be a sign that the code should be refactored.",
    ),
    (
        RuleCategory::Testing,
        "Code should be written with testability in mind.\n\
Tightly coupled code, hidden dependencies, and heavy use of globals\n\
make unit testing difficult and brittle.",
    ),
    (
        RuleCategory::Testing,
        "Avoid time-dependent or environment-dependent logic without proper abstraction.\n\
Direct calls to system time, random number generators, or environment variables\n\
should be isolated to make tests deterministic.",
    ),
    (
        RuleCategory::Security,
        "Never trust external input without validation.\n\
Inputs from users, files, or network sources should be validated and sanitized\n\
before being used in business logic or database operations.",
    ),
    (
        RuleCategory::Security,
        "Avoid using `eval`, `exec`, or dynamic code execution unless there is a strong justification.\n\
These constructs can introduce serious security risks and make code harder to reason about.",
    ),
];

/// The built-in corpus, ids assigned in declaration order.
pub fn default_rules() -> Vec<RuleDocument> {
    RULES
        .iter()
        .enumerate()
        .map(|(id, (category, text))| RuleDocument {
            id,
            category: *category,
            text: (*text).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_rules_shape() {
        let rules = default_rules();
        assert_eq!(rules.len(), 19);
        assert!(rules.iter().enumerate().all(|(i, r)| r.id == i));

        let mut per_category: HashMap<RuleCategory, usize> = HashMap::new();
        for rule in &rules {
            *per_category.entry(rule.category).or_default() += 1;
        }
        assert_eq!(per_category.len(), 7);
        assert_eq!(per_category[&RuleCategory::Testing], 2);
        assert_eq!(per_category[&RuleCategory::Readability], 3);
    }

    #[test]
    fn test_rules_keep_line_breaks() {
        let rules = default_rules();
        assert_eq!(
            rules[5].text,
            "Avoid catching broad exceptions such as `except Exception:` unless absolutely necessary.\n\
             Catching broad exceptions can hide real bugs and make debugging difficult.\n\
             Catch specific exception types and handle them intentionally."
        );
        assert!(rules.iter().all(|r| r.text == r.text.trim()));
        assert!(rules.iter().all(|r| r.text.lines().count() >= 2));
    }
}
