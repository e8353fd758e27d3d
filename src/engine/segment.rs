//! Block segmentation.
//!
//! Turns the flat lines of one policy body into a tree of scopes:
//!
//! ```text
//! drop-bogons                 ┐ global (before the first if/elseif)
//! if med eq 10 then           ┐ branch If  "med eq 10"
//!   set weight 100            ┘
//! elseif tag eq 5 then        ┐ branch ElseIf "tag eq 5"
//!   pass                      ┘
//! else                        ─ ends this scope
//!   if community ... then     ┐ else scope: segmented the same way,
//!     drop                    │ to any depth
//!   else                      │
//!     pass                    ┘
//! ```
//!
//! Only the matcher's `BRANCH` rules are consulted; every other line is
//! bucketed verbatim, recognized or not. There is no grammar check: a stray
//! `elseif` opens a branch like any other. With `strict` set, an `elseif` or
//! `else` that has no `if` before it in its scope is rejected instead.
//!
//! Else chains are built with a loop over scopes and folded into nested
//! boxes afterwards, so input depth never turns into call-stack depth here.

use super::compiled_rules::RuleClass;
use super::matcher::LineMatcher;
use crate::error::{Error, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    If,
    ElseIf,
    Else,
}

impl BranchKind {
    fn from_rule(name: &str) -> Option<Self> {
        match name {
            "branch.if" => Some(BranchKind::If),
            "branch.elseif" => Some(BranchKind::ElseIf),
            "branch.else" => Some(BranchKind::Else),
            _ => None,
        }
    }
}

/// One `if` / `elseif` alternative and the statements under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub kind: BranchKind,
    /// The branch-start line, verbatim.
    pub line: String,
    /// Condition text after the keyword, without a trailing `then`.
    pub condition: String,
    /// Lines up to the next branch start or the end of the scope.
    pub statements: Vec<String>,
}

/// A policy body, or the body of an `else`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scope {
    /// Lines seen before the first `if`/`elseif` of this scope.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global: Vec<String>,
    /// Branches in input order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<Branch>,
    /// Everything after this scope's `else` line.
    #[serde(rename = "else", skip_serializing_if = "Option::is_none")]
    pub else_scope: Option<Box<Scope>>,
}

impl Scope {
    /// The first `if` branch of this scope.
    pub fn if_branch(&self) -> Option<&Branch> {
        self.branches.iter().find(|b| b.kind == BranchKind::If)
    }

    /// Statements recorded under the branch whose start line is `line`.
    pub fn statements_for(&self, line: &str) -> Option<&[String]> {
        self.branches.iter().find(|b| b.line == line).map(|b| b.statements.as_slice())
    }

    /// Number of nested `else` scopes below this one.
    pub fn else_depth(&self) -> usize {
        std::iter::successors(self.else_scope.as_deref(), |s| s.else_scope.as_deref()).count()
    }
}

/// Splits bodies into `Scope` trees.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'a> {
    matcher: LineMatcher<'a>,
    strict: bool,
}

impl<'a> Segmenter<'a> {
    pub fn new(matcher: LineMatcher<'a>, strict: bool) -> Self {
        Segmenter { matcher, strict }
    }

    /// Segment `lines` (one policy body). Lines are trimmed; nothing else is
    /// dropped.
    pub fn segment<S: AsRef<str>>(&self, lines: &[S]) -> Result<Scope> {
        let mut chain: Vec<Scope> = Vec::new();
        let mut rest = lines;
        let mut offset = 0;

        loop {
            let (scope, tail) = self.segment_scope(rest, offset)?;
            chain.push(scope);
            match tail {
                Some(next) => {
                    offset += rest.len() - next.len();
                    rest = next;
                }
                None => break,
            }
        }

        let mut inner: Option<Box<Scope>> = None;
        while let Some(mut scope) = chain.pop() {
            scope.else_scope = inner.take();
            inner = Some(Box::new(scope));
        }
        Ok(inner.map(|scope| *scope).unwrap_or_default())
    }

    /// One scope, up to and excluding its `else` line. Returns the lines after
    /// the `else`, if there was one.
    fn segment_scope<'l, S: AsRef<str>>(&self, lines: &'l [S], offset: usize) -> Result<(Scope, Option<&'l [S]>)> {
        let mut scope = Scope::default();
        let mut open: Option<Branch> = None;

        for (idx, raw) in lines.iter().enumerate() {
            let line = raw.as_ref().trim();

            match self.boundary(line) {
                Some((kind @ (BranchKind::If | BranchKind::ElseIf), condition)) => {
                    if kind == BranchKind::ElseIf && open.is_none() && scope.branches.is_empty() {
                        self.stray(offset + idx + 1, line)?;
                    }
                    scope.branches.extend(open.take());
                    open = Some(Branch { kind, line: line.to_string(), condition, statements: Vec::new() });
                }
                Some((BranchKind::Else, _)) => {
                    if open.is_none() && scope.branches.is_empty() {
                        self.stray(offset + idx + 1, line)?;
                    }
                    scope.branches.extend(open.take());
                    return Ok((scope, Some(&lines[idx + 1..])));
                }
                None => match open.as_mut() {
                    Some(branch) => branch.statements.push(line.to_string()),
                    None => scope.global.push(line.to_string()),
                },
            }
        }

        scope.branches.extend(open.take());
        Ok((scope, None))
    }

    fn boundary(&self, line: &str) -> Option<(BranchKind, String)> {
        let m = self.matcher.first_match(line, RuleClass::BRANCH)?;
        let kind = BranchKind::from_rule(m.rule_name())?;
        let condition = m.text("condition").unwrap_or_default().to_string();
        Some((kind, condition))
    }

    fn stray(&self, line: usize, text: &str) -> Result<()> {
        if self.strict {
            return Err(Error::BranchOrder { line, text: text.to_string() });
        }
        tracing::warn!(line, text, "branch without a preceding `if` in its scope");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::default_matcher;

    fn lenient() -> Segmenter<'static> {
        Segmenter::new(default_matcher(), false)
    }

    fn lines(body: &str) -> Vec<&str> {
        body.lines().collect()
    }

    #[test]
    fn if_else_scenario() {
        let body = "if destination in (1.2.3.0/24)\n  set weight 100\nelse\n  drop";
        let scope = lenient().segment(&lines(body)).unwrap();

        assert!(scope.global.is_empty());
        assert_eq!(scope.branches.len(), 1);
        let branch = &scope.branches[0];
        assert_eq!(branch.kind, BranchKind::If);
        assert_eq!(branch.condition, "destination in (1.2.3.0/24)");
        assert_eq!(branch.statements, ["set weight 100"]);

        let else_scope = scope.else_scope.as_deref().unwrap();
        assert_eq!(else_scope.global, ["drop"]);
        assert!(else_scope.branches.is_empty());
        assert!(else_scope.else_scope.is_none());
    }

    #[test]
    fn trailing_then_is_not_part_of_condition() {
        let scope = lenient().segment(&["if med eq 10 then", "pass"]).unwrap();
        assert_eq!(scope.branches[0].condition, "med eq 10");
        assert_eq!(scope.branches[0].line, "if med eq 10 then");
    }

    #[test]
    fn body_without_if_is_all_global() {
        let scope = lenient().segment(&["set weight 5", "mystery statement", "pass"]).unwrap();
        assert_eq!(scope.global, ["set weight 5", "mystery statement", "pass"]);
        assert!(scope.branches.is_empty());
        assert!(scope.else_scope.is_none());
    }

    #[test]
    fn global_stops_at_first_branch() {
        let scope = lenient().segment(&["set tag 1", "if med eq 1 then", "pass", "elseif med eq 2 then", "drop"]).unwrap();
        assert_eq!(scope.global, ["set tag 1"]);
        assert_eq!(scope.branches.len(), 2);
        assert_eq!(scope.branches[1].kind, BranchKind::ElseIf);
        assert_eq!(scope.statements_for("elseif med eq 2 then"), Some(&["drop".to_string()][..]));
    }

    #[test]
    fn nested_else_is_independent_of_outer_scope() {
        let body = [
            "set tag 9",
            "if med eq 1 then",
            "pass",
            "else",
            "set weight 1",
            "if tag eq 2 then",
            "drop",
            "else",
            "pass",
        ];
        let scope = lenient().segment(&body).unwrap();
        assert_eq!(scope.global, ["set tag 9"]);
        assert_eq!(scope.else_depth(), 2);

        let inner = scope.else_scope.as_deref().unwrap();
        assert_eq!(inner.global, ["set weight 1"]);
        assert_eq!(inner.if_branch().unwrap().condition, "tag eq 2");

        let innermost = inner.else_scope.as_deref().unwrap();
        assert_eq!(innermost.global, ["pass"]);
    }

    #[test]
    fn unrecognized_lines_keep_their_text() {
        let scope = lenient().segment(&["if med eq 1 then", "  frobnicate   the route", "pass"]).unwrap();
        assert_eq!(scope.branches[0].statements, ["frobnicate   the route", "pass"]);
    }

    #[test]
    fn stray_elseif_is_absorbed_when_lenient() {
        let scope = lenient().segment(&["pass", "elseif med eq 2 then", "drop"]).unwrap();
        assert_eq!(scope.global, ["pass"]);
        assert_eq!(scope.branches[0].kind, BranchKind::ElseIf);
    }

    #[test]
    fn stray_elseif_is_rejected_when_strict() {
        let strict = Segmenter::new(default_matcher(), true);
        let err = strict.segment(&["pass", "elseif med eq 2 then", "drop"]).unwrap_err();
        assert!(matches!(err, Error::BranchOrder { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn strict_line_numbers_count_from_body_start() {
        let strict = Segmenter::new(default_matcher(), true);
        let err = strict.segment(&["if med eq 1 then", "pass", "else", "drop", "else", "pass"]).unwrap_err();
        assert!(matches!(err, Error::BranchOrder { line: 5, .. }), "{err:?}");
    }

    #[test]
    fn deep_else_chain_does_not_recurse() {
        let mut body = Vec::new();
        for _ in 0..5_000 {
            body.push("if med eq 1 then");
            body.push("pass");
            body.push("else");
        }
        body.push("drop");
        let scope = lenient().segment(&body).unwrap();
        assert_eq!(scope.else_depth(), 5_000);
        // Tear the chain down iteratively; a derived drop would recurse.
        let mut next = scope.else_scope;
        while let Some(mut s) = next {
            next = s.else_scope.take();
        }
    }
}
