#[cfg(test)]
mod resolver_tests {
    use dlox::ast::{ExprKind, Stmt};
    use dlox::error::LoxError;
    use dlox::parser::Parser;
    use dlox::resolver::{ResolutionTable, Resolver};
    use dlox::scanner::Scanner;

    fn parse(source: &str) -> Vec<Stmt> {
        let tokens = Scanner::new(source)
            .collect::<Result<Vec<_>, _>>()
            .expect("source should scan");
        Parser::new(tokens)
            .parse()
            .unwrap_or_else(|errors| panic!("parse failed: {:?}", errors))
    }

    fn resolve(source: &str) -> Result<ResolutionTable, Vec<LoxError>> {
        let program = parse(source);
        let mut resolver = Resolver::new();
        resolver.resolve(&program)
    }

    fn messages(source: &str) -> Vec<String> {
        match resolve(source) {
            Ok(table) => panic!("expected resolve errors, got {:?}", table),
            Err(errors) => errors.iter().map(ToString::to_string).collect(),
        }
    }

    fn assert_single_error(source: &str, expected: &str) {
        let errors = messages(source);
        assert_eq!(errors, vec![expected.to_string()]);
    }

    #[test]
    fn test_resolving_twice_is_deterministic() {
        let program = parse(
            "var g = 1;
             funktion f(a) {
                 var b = a;
                 { var c = b; drucke c + g; }
                 funktion inner() { zurückgeben a + b; }
                 zurückgeben inner;
             }
             klasse K { m() { zurückgeben dies; } }",
        );

        let first = Resolver::new().resolve(&program).unwrap();
        let second = Resolver::new().resolve(&program).unwrap();

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_globals_are_left_out_of_the_table() {
        let program = parse("var a = 1; drucke a;");
        let table = Resolver::new().resolve(&program).unwrap();

        assert!(table.is_empty());
    }

    #[test]
    fn test_distances_count_enclosing_scopes() {
        let program = parse("{ var a = 1; { { drucke a; } } }");
        let table = Resolver::new().resolve(&program).unwrap();

        let Stmt::Block(outer) = &program[0] else { panic!() };
        let Stmt::Block(middle) = &outer[1] else { panic!() };
        let Stmt::Block(inner) = &middle[0] else { panic!() };
        let Stmt::Print(expr) = &inner[0] else { panic!() };

        assert!(matches!(expr.kind, ExprKind::Variable(_)));
        assert_eq!(table.get(expr.id), Some(2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_read_in_own_initializer() {
        assert_single_error(
            "{ var a = a; }",
            "[Zeile 1] Fehler bei 'a': Kann lokale Variable in ihrer eigenen Initialisierung nicht lesen.",
        );
    }

    #[test]
    fn test_global_self_initializer_is_allowed() {
        assert!(resolve("var a = a;").is_ok());
    }

    #[test]
    fn test_duplicate_declaration_in_same_block() {
        assert_single_error(
            "{ var x = 1; var x = 2; }",
            "[Zeile 1] Fehler bei 'x': Bereits eine Variable mit diesem Namen in diesem Gültigkeitsbereich.",
        );
    }

    #[test]
    fn test_shadowing_in_nested_block_is_allowed() {
        assert!(resolve("{ var x = 1; { var x = 2; } }").is_ok());
        assert!(resolve("var x = 1; var x = 2;").is_ok());
    }

    #[test]
    fn test_duplicate_parameter() {
        assert_single_error(
            "funktion f(a, a) {}",
            "[Zeile 1] Fehler bei 'a': Bereits eine Variable mit diesem Namen in diesem Gültigkeitsbereich.",
        );
    }

    #[test]
    fn test_top_level_return() {
        assert_single_error(
            "zurückgeben 1;",
            "[Zeile 1] Fehler bei 'zurückgeben': Kann nicht von Code auf oberster Ebene zurückgeben.",
        );
    }

    #[test]
    fn test_return_value_from_initializer() {
        assert_single_error(
            "klasse A { init() { zurückgeben 1; } }",
            "[Zeile 1] Fehler bei 'zurückgeben': Kann keinen Wert von einem Initialisierer zurückgeben.",
        );
    }

    #[test]
    fn test_bare_return_in_initializer_is_allowed() {
        assert!(resolve("klasse A { init() { zurückgeben; } }").is_ok());
    }

    #[test]
    fn test_self_inheritance() {
        let errors = messages("klasse A < A {}");

        assert_eq!(
            errors[0],
            "[Zeile 1] Fehler bei 'A': Eine Klasse kann nicht von sich selbst erben."
        );
    }

    #[test]
    fn test_this_outside_class() {
        assert_single_error(
            "drucke dies;",
            "[Zeile 1] Fehler bei 'dies': Kann 'dies' nicht außerhalb einer Klasse verwenden.",
        );
        assert_single_error(
            "funktion f() { zurückgeben dies; }",
            "[Zeile 1] Fehler bei 'dies': Kann 'dies' nicht außerhalb einer Klasse verwenden.",
        );
    }

    #[test]
    fn test_super_outside_class() {
        assert_single_error(
            "super.m();",
            "[Zeile 1] Fehler bei 'super': Kann 'super' nicht außerhalb einer Klasse verwenden.",
        );
    }

    #[test]
    fn test_super_without_superclass() {
        assert_single_error(
            "klasse A { m() { super.m(); } }",
            "[Zeile 1] Fehler bei 'super': Kann 'super' nicht in einer Klasse ohne Oberklasse verwenden.",
        );
    }

    #[test]
    fn test_class_context_is_restored_after_nested_class() {
        // After B closes, `super` inside A's later method is still illegal.
        let errors = messages(
            "klasse Basis {}
             klasse A {
                 m() { klasse B < Basis { n() { super.n(); } } }
                 o() { super.o(); }
             }",
        );

        assert_eq!(errors.len(), 1, "{:?}", errors);
        assert!(errors[0].starts_with("[Zeile 4]"));
    }

    #[test]
    fn test_all_errors_are_collected() {
        let errors = messages(
            "zurückgeben 1;
             drucke dies;
             { var a = 1; var a = 2; }",
        );

        assert_eq!(errors.len(), 3, "{:?}", errors);
        assert!(errors[0].starts_with("[Zeile 1]"));
        assert!(errors[1].starts_with("[Zeile 2]"));
        assert!(errors[2].starts_with("[Zeile 3]"));
    }
}
