use rpl_facts::{ParseDetails, PolicyTrace, Scope};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(details: &ParseDetails, color: bool) {
    let palette = ansi::Palette::new(color);

    if details.policies.is_empty() {
        println!("\n{}", palette.dim("  No route-policy blocks found"));
    }

    for (policy, facts) in details.policies.iter().zip(&details.facts) {
        println!("\n{}", palette.bold(palette.paint(format!("⚙  route-policy {}", policy.name), ansi::CYAN)));

        println!("\n{}", palette.paint("━━━ Blocks ━━━", ansi::GRAY));
        print_scope(&policy.scope, &palette);

        println!("\n{}", palette.paint("━━━ Rules ━━━", ansi::GRAY));
        print_rules(policy, &palette);

        println!("\n{}", palette.paint("━━━ Facts ━━━", ansi::GRAY));
        let json = serde_json::to_string_pretty(facts).unwrap_or_default();
        for line in json.lines() {
            println!("  {line}");
        }

        println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
        println!(
            "  Lines: {}  │  Segment: {}  │  Resolve: {}",
            palette.paint(policy.metrics.lines.to_string(), ansi::BLUE),
            palette.paint(format!("{:?}", policy.metrics.segment), ansi::CYAN),
            palette.dim(format!("{:?}", policy.metrics.resolve)),
        );
    }

    println!("\n{} {}", palette.dim("Total:"), palette.paint(format!("{:?}", details.total), ansi::GREEN));
    println!();
}

fn print_scope(scope: &Scope, palette: &ansi::Palette) {
    let chain = std::iter::successors(Some(scope), |s| s.else_scope.as_deref());
    for (level, scope) in chain.enumerate() {
        let indent = "  ".repeat(level + 1);
        if level > 0 {
            println!("{}{}", "  ".repeat(level), palette.paint("else", ansi::BLUE));
        }
        if !scope.global.is_empty() {
            println!("{indent}{} {}", palette.dim("global:"), palette.paint(format!("{} lines", scope.global.len()), ansi::YELLOW));
        }
        for branch in &scope.branches {
            println!(
                "{indent}{} {} {}",
                palette.paint(format!("{:?}", branch.kind).to_lowercase(), ansi::BLUE),
                branch.condition,
                palette.dim(format!("({} lines)", branch.statements.len())),
            );
        }
    }
}

fn print_rules(policy: &PolicyTrace, palette: &ansi::Palette) {
    let metrics = &policy.metrics;
    println!(
        "  Recognized: {}  │  Unrecognized: {}",
        palette.paint(metrics.recognized().to_string(), ansi::GREEN),
        if metrics.unrecognized.is_empty() {
            palette.dim("0")
        } else {
            palette.paint(metrics.unrecognized.len().to_string(), ansi::YELLOW)
        }
    );

    for (rule, hits) in &metrics.rule_hits {
        println!("    {} {}", palette.paint(*rule, ansi::CYAN), palette.dim(format!("×{hits}")));
    }
    for line in &metrics.unrecognized {
        println!("    {} {}", palette.paint("?", ansi::YELLOW), palette.dim(line));
    }
    for line in &metrics.incomplete_branches {
        println!("    {} {} {}", palette.paint("!", ansi::YELLOW), line, palette.dim("(conditions incomplete)"));
    }
}
