// Fri Feb 6 2026 - Alex

/// One evidence test against a candidate routine's inferred body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// The body loads `value` from a literal pool.
    LoadsLiteral { value: u32 },
    /// The body contains a branch or call whose resolved target is `target`.
    CallsTarget { target: u32 },
    /// The body references `value` within `radius` bytes of some reference
    /// to `other` (either reference kind counts).
    RefNear { value: u32, other: u32, radius: u32 },
}

impl Predicate {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadsLiteral { .. } => "loads-literal",
            Self::CallsTarget { .. } => "calls-target",
            Self::RefNear { .. } => "ref-near",
        }
    }
}

/// Extra points on top of a term's base score when the evidence is tight:
/// the satisfying site (or site pair, for `RefNear`) sits within `within`
/// bytes. Named so it shows up in the candidate's evidence list.
#[derive(Debug, Clone)]
pub struct Bonus {
    pub name: String,
    pub points: u32,
    pub within: u32,
}

#[derive(Debug, Clone)]
pub struct Term {
    predicate: Predicate,
    points: u32,
    bonus: Option<Bonus>,
}

impl Term {
    pub fn new(predicate: Predicate) -> Self {
        Self { predicate, points: 1, bonus: None }
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn with_bonus(mut self, name: &str, points: u32, within: u32) -> Self {
        self.bonus = Some(Bonus { name: name.to_string(), points, within });
        self
    }

    pub fn predicate(&self) -> Predicate {
        self.predicate
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn bonus(&self) -> Option<&Bonus> {
        self.bonus.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    /// Every term must hold.
    All,
    /// At least one term must hold.
    Any,
}

/// A declarative AND/OR composition of predicates.
#[derive(Debug, Clone)]
pub struct Query {
    terms: Vec<Term>,
    combine: Combine,
}

impl Query {
    pub fn all() -> Self {
        Self { terms: Vec::new(), combine: Combine::All }
    }

    pub fn any() -> Self {
        Self { terms: Vec::new(), combine: Combine::Any }
    }

    pub fn term(mut self, term: Term) -> Self {
        self.terms.push(term);
        self
    }

    /// Shorthand for a one-point term with no bonus.
    pub fn require(self, predicate: Predicate) -> Self {
        self.term(Term::new(predicate))
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn combine(&self) -> Combine {
        self.combine
    }
}
