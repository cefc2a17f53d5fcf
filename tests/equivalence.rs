use autoeq::{
    are_equivalent, check_equivalence, check_inclusion, compare, compile, is_subset, Alphabet,
    DeterministicAutomaton, Error, FiniteAutomaton, Limits, Regex, RegexOps, Side, Stage,
    SyntaxErrorKind, Verdict,
};

fn alphabet(symbols: &str) -> Alphabet {
    Alphabet::new(symbols.chars())
}

const CORPUS: [&str; 12] = [
    "",
    "a",
    "a|b",
    "b|a",
    "(a|b)*c",
    "a*b*",
    "(a|b)*",
    "[]",
    "()",
    "(ab|ba)+",
    ".*a?",
    "((a|)b)*",
];

#[test]
fn known_equivalences() {
    assert!(are_equivalent("a|b", "b|a", &alphabet("ab")).unwrap());
    assert!(are_equivalent("a*", "aa*|", &alphabet("a")).unwrap());
    assert!(!are_equivalent("ab", "ba", &alphabet("ab")).unwrap());
    assert!(!are_equivalent("(a|b)*", "a*b*", &alphabet("ab")).unwrap());
    assert!(!are_equivalent("", "a*", &alphabet("a")).unwrap());
}

#[test]
fn classic_identities() {
    let ab = alphabet("ab");
    assert!(are_equivalent("(a*b*)*", "(a|b)*", &ab).unwrap());
    assert!(are_equivalent("a(ba)*", "(ab)*a", &ab).unwrap());
    assert!(are_equivalent("a+", "aa*", &ab).unwrap());
    assert!(are_equivalent("a?", "a|", &ab).unwrap());
    assert!(are_equivalent("a**", "a*", &ab).unwrap());
    assert!(are_equivalent("(a|b)*", ".*", &ab).unwrap());
    assert!(are_equivalent("(a|b)*abb|b", "b|(a|b)*abb", &ab).unwrap());
    assert!(!are_equivalent("a+", "a*", &ab).unwrap());

    assert!(are_equivalent("[]a", "[]", &ab).unwrap());
    assert!(are_equivalent("[]*", "()", &ab).unwrap());
    assert!(are_equivalent("a[]|b", "b", &ab).unwrap());
    assert!(!are_equivalent("[]", "()", &ab).unwrap());

    assert!(are_equivalent(".", "a|b|c", &alphabet("abc")).unwrap());
    assert!(are_equivalent(r"\*a", "[*]a", &alphabet("*a")).unwrap());
}

#[test]
fn reflexive() {
    let abc = alphabet("abc");
    for expr in CORPUS {
        assert!(are_equivalent(expr, expr, &abc).unwrap(), "{}", expr);
    }
}

#[test]
fn symmetric() {
    let abc = alphabet("abc");
    for left in CORPUS {
        for right in CORPUS {
            assert_eq!(
                are_equivalent(left, right, &abc).unwrap(),
                are_equivalent(right, left, &abc).unwrap(),
                "{} vs {}",
                left,
                right
            );
        }
    }
}

#[test]
fn rendering_keeps_language() {
    let abc = alphabet("abc");
    for expr in CORPUS {
        let rendered = Regex::parse(expr, &abc).unwrap().to_string();
        assert!(
            are_equivalent(expr, &rendered, &abc).unwrap(),
            "{} rendered as {}",
            expr,
            rendered
        );
    }
}

fn words_up_to(alphabet: &Alphabet, length: usize) -> Vec<String> {
    let mut words = vec![String::new()];
    let mut last = vec![String::new()];

    for _ in 0..length {
        last = last
            .iter()
            .flat_map(|word| alphabet.iter().map(move |c| format!("{}{}", word, c)))
            .collect();
        words.extend(last.iter().cloned());
    }

    words
}

fn built_trees() -> Vec<RegexOps> {
    use RegexOps::*;

    let sym = |c: char| Box::new(Symbol(c));
    vec![
        Empty,
        Epsilon,
        Repeat(Box::new(Empty)),
        Repeat(Box::new(Repeat(sym('a')))),
        OneOrMore(Box::new(Repeat(sym('b')))),
        Consecutive(sym('a'), Box::new(Consecutive(sym('b'), sym('c')))),
        Consecutive(
            Box::new(Either(sym('a'), Box::new(Epsilon))),
            Box::new(Repeat(Box::new(Consecutive(sym('*'), sym('|'))))),
        ),
        Either(
            Box::new(Empty),
            Box::new(Either(sym('('), Box::new(Consecutive(sym(')'), sym('\\'))))),
        ),
        Consecutive(
            Box::new(Epsilon),
            Box::new(Either(
                Box::new(Epsilon),
                Box::new(OneOrMore(Box::new(Either(sym('.'), sym('a'))))),
            )),
        ),
        Repeat(Box::new(Consecutive(Box::new(Empty), sym('a')))),
    ]
}

#[test]
fn rendered_trees_keep_language() {
    let alphabet = alphabet("abc*|()\\.");
    let limits = Limits::default();
    let words = words_up_to(&alphabet, 4);

    for ops in built_trees() {
        let regex = Regex::from_ops(ops);
        let rendered = regex.to_string();
        let rendered_again = Regex::parse(&rendered, &alphabet).unwrap().to_string();
        assert!(
            are_equivalent(&rendered, &rendered_again, &alphabet).unwrap(),
            "{} rendered again as {}",
            rendered,
            rendered_again
        );

        let nfa = FiniteAutomaton::from_regex(&regex);
        let built = DeterministicAutomaton::from_nfa(&nfa, &alphabet, &limits).unwrap();
        let parsed = compile(&rendered, &alphabet, &limits).unwrap();
        for word in &words {
            assert_eq!(built.accepts(word), parsed.accepts(word), "{} on {:?}", rendered, word);
        }
        assert!(compare(&built, &parsed, &limits).unwrap().is_equivalent(), "{}", rendered);
    }
}

#[test]
fn witness_separates_languages() {
    let abc = alphabet("abc");
    let limits = Limits::default();

    for left in CORPUS {
        for right in CORPUS {
            let verdict = check_equivalence(left, right, &abc, &limits).unwrap();
            let Verdict::Different {
                witness,
                accepted_by,
            } = verdict
            else {
                continue;
            };

            let a = compile(left, &abc, &limits).unwrap();
            let b = compile(right, &abc, &limits).unwrap();
            assert_ne!(a.accepts(&witness), b.accepts(&witness), "{} vs {}", left, right);
            assert_eq!(
                accepted_by == Side::Left,
                a.accepts(&witness),
                "{} vs {}",
                left,
                right
            );
        }
    }
}

#[test]
fn deterministic() {
    let ab = alphabet("ab");
    let limits = Limits::default();
    let first = check_equivalence("(a|b)*abb", "(a|b)*bab", &ab, &limits).unwrap();
    let second = check_equivalence("(a|b)*abb", "(a|b)*bab", &ab, &limits).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        Verdict::Different {
            witness: "abb".to_string(),
            accepted_by: Side::Left
        }
    );
}

#[test]
fn syntax_errors() {
    let a = alphabet("a");

    match are_equivalent("(a", "a", &a) {
        Err(Error::Syntax(error)) => {
            assert_eq!(error.kind, SyntaxErrorKind::UnbalancedOpenParen);
            assert_eq!(error.expr, "(a");
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }

    match are_equivalent("a", "ab", &a) {
        Err(Error::Syntax(error)) => {
            assert_eq!(error.kind, SyntaxErrorKind::UnknownSymbol('b'));
            assert_eq!(error.position, 1);
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }

    assert!(matches!(are_equivalent("a", "*", &a), Err(Error::Syntax(_))));
    assert!(matches!(are_equivalent("a)", "a", &a), Err(Error::Syntax(_))));
}

#[test]
fn inferred_alphabet() {
    let inferred = Alphabet::from_exprs(&["(a|b)*", "a*b*"]).unwrap();
    assert_eq!(inferred, alphabet("ab"));
    assert!(!are_equivalent("(a|b)*", "a*b*", &inferred).unwrap());
}

#[test]
fn inferred_wildcard_is_printable_ascii() {
    let inferred = Alphabet::from_exprs(&[".*", "a*"]).unwrap();
    assert!(inferred.contains('z') && inferred.contains(' ') && inferred.contains('\t'));
    assert!(!are_equivalent(".*", "a*", &inferred).unwrap());
    assert_eq!(
        check_equivalence(".*", "a*", &inferred, &Limits::default()).unwrap(),
        Verdict::Different {
            witness: "\t".to_string(),
            accepted_by: Side::Left
        }
    );

    let inferred = Alphabet::from_exprs(&[".", "a"]).unwrap();
    assert!(!are_equivalent(".", "a", &inferred).unwrap());
    assert!(is_subset("a", ".", &inferred).unwrap());
}

#[test]
fn repeated_plus_stays_small() {
    let a = alphabet("a");
    let limits = Limits::default();

    let chained = format!("a{}", "+".repeat(30));
    assert!(are_equivalent(&chained, "aa*", &a).unwrap());
    assert_eq!(compile(&chained, &a, &limits).unwrap().state_count(), 2);

    let nested = format!("{}a{}", "(".repeat(30), "+)".repeat(30));
    assert!(are_equivalent(&nested, "a+", &a).unwrap());

    let ab = alphabet("ab");
    let nested = format!("{}b{}", "(a".repeat(12), "+)".repeat(12));
    assert!(is_subset(&nested, "a(a|b)*b", &ab).unwrap());
    assert!(!is_subset("a(a|b)*b", &nested, &ab).unwrap());
}

#[test]
fn long_literals() {
    let a = alphabet("a");
    let long = "a".repeat(200_000);
    assert!(are_equivalent(&long, &long, &a).unwrap());

    let verdict = check_equivalence(&long, &long[1..], &a, &Limits::default()).unwrap();
    assert_eq!(
        verdict,
        Verdict::Different {
            witness: long[1..].to_string(),
            accepted_by: Side::Right
        }
    );

    let ab = alphabet("ab");
    let alternatives = vec!["ab"; 50_000].join("|");
    assert!(are_equivalent(&alternatives, "ab", &ab).unwrap());
}

#[test]
fn inclusion() {
    let ab = alphabet("ab");
    assert!(is_subset("a", "a?", &ab).unwrap());
    assert!(is_subset("a*b*", "(a|b)*", &ab).unwrap());
    assert!(!is_subset("(a|b)*", "a*b*", &ab).unwrap());
    assert_eq!(
        check_inclusion("a*", "a?", &ab, &Limits::default()).unwrap(),
        Some("aa".to_string())
    );
}

#[test]
fn budgets() {
    let ab = alphabet("ab");

    let limits = Limits::default().with_max_dfa_states(4);
    assert_eq!(
        check_equivalence("(a|b)*a(a|b)(a|b)(a|b)", "(a|b)*b", &ab, &limits).unwrap_err(),
        Error::ResourceExceeded {
            stage: Stage::Determinization,
            limit: 4
        }
    );

    let limits = Limits::default().with_max_product_states(2);
    assert_eq!(
        check_equivalence("(a|b)*", "(a*b*)*", &ab, &limits).unwrap_err(),
        Error::ResourceExceeded {
            stage: Stage::ProductSearch,
            limit: 2
        }
    );
}
