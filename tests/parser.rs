#[cfg(test)]
mod parser_tests {
    use std::collections::HashSet;

    use dlox::ast::*;
    use dlox::error::LoxError;
    use dlox::parser::{Parser, MAX_ARGUMENTS};
    use dlox::scanner::Scanner;
    use dlox::token::Token;

    fn tokens(source: &str) -> Vec<Token> {
        Scanner::new(source)
            .collect::<Result<_, _>>()
            .expect("source should scan")
    }

    fn parse(source: &str) -> Vec<Stmt> {
        Parser::new(tokens(source))
            .parse()
            .unwrap_or_else(|errors| panic!("parse failed: {:?}", errors))
    }

    fn parse_errors(source: &str) -> Vec<LoxError> {
        match Parser::new(tokens(source)).parse() {
            Ok(stmts) => panic!("expected parse errors, got {:?}", stmts),
            Err(errors) => errors,
        }
    }

    fn collect_ids(expr: &Expr, ids: &mut Vec<ExprId>) {
        ids.push(expr.id);
        match &expr.kind {
            ExprKind::Literal(_) | ExprKind::Variable(_) | ExprKind::This(_) => {}
            ExprKind::Super { .. } => {}
            ExprKind::Grouping(inner) | ExprKind::Unary { right: inner, .. } => {
                collect_ids(inner, ids)
            }
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                collect_ids(left, ids);
                collect_ids(right, ids);
            }
            ExprKind::Assign { value, .. } => collect_ids(value, ids),
            ExprKind::Call {
                callee, arguments, ..
            } => {
                collect_ids(callee, ids);
                for arg in arguments {
                    collect_ids(arg, ids);
                }
            }
            ExprKind::Get { object, .. } => collect_ids(object, ids),
            ExprKind::Set { object, value, .. } => {
                collect_ids(object, ids);
                collect_ids(value, ids);
            }
        }
    }

    #[test]
    fn test_for_loop_desugars_to_while_block() {
        let stmts = parse("für (var i = 0; i < 3; i = i + 1) drucke i;");
        assert_eq!(stmts.len(), 1);

        let Stmt::Block(outer) = &stmts[0] else {
            panic!("expected block, got {:?}", stmts[0]);
        };
        assert_eq!(outer.len(), 2);
        assert!(matches!(&outer[0], Stmt::Var { name, .. } if name.lexeme == "i"));

        let Stmt::While { condition, body } = &outer[1] else {
            panic!("expected while, got {:?}", outer[1]);
        };
        assert!(matches!(condition.kind, ExprKind::Binary { .. }));

        let Stmt::Block(inner) = body.as_ref() else {
            panic!("expected loop body block, got {:?}", body);
        };
        assert!(matches!(inner[0], Stmt::Print(_)));
        assert!(matches!(&inner[1], Stmt::Expression(e) if matches!(e.kind, ExprKind::Assign { .. })));
    }

    #[test]
    fn test_for_loop_without_clauses_loops_on_true() {
        let stmts = parse("für (;;) drucke 1;");

        let Stmt::While { condition, body } = &stmts[0] else {
            panic!("expected bare while, got {:?}", stmts[0]);
        };
        assert_eq!(condition.kind, ExprKind::Literal(LiteralValue::Bool(true)));
        assert!(matches!(body.as_ref(), Stmt::Print(_)));
    }

    #[test]
    fn test_precedence() {
        let stmts = parse("1 + 2 * 3 == 7 oder falsch;");

        let Stmt::Expression(expr) = &stmts[0] else {
            panic!("expected expression statement");
        };
        let ExprKind::Logical { left, operator, .. } = &expr.kind else {
            panic!("expected logical, got {:?}", expr.kind);
        };
        assert_eq!(operator.lexeme, "oder");

        let ExprKind::Binary { left, operator, .. } = &left.kind else {
            panic!("expected equality");
        };
        assert_eq!(operator.lexeme, "==");

        let ExprKind::Binary { right, operator, .. } = &left.kind else {
            panic!("expected addition");
        };
        assert_eq!(operator.lexeme, "+");
        assert!(matches!(&right.kind, ExprKind::Binary { operator, .. } if operator.lexeme == "*"));
    }

    #[test]
    fn test_every_expression_gets_a_distinct_id() {
        let stmts = parse("var a = 1; a = a + f(a, b.c); x.y = dies;");

        let mut ids = Vec::new();
        for stmt in &stmts {
            match stmt {
                Stmt::Var {
                    initializer: Some(e),
                    ..
                }
                | Stmt::Expression(e) => collect_ids(e, &mut ids),
                other => panic!("unexpected statement {:?}", other),
            }
        }

        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len(), "ids repeat: {:?}", ids);
    }

    #[test]
    fn test_first_id_offsets_numbering() {
        let mut parser = Parser::with_first_id(tokens("drucke 1;"), 100);
        let stmts = parser.parse().unwrap();

        let Stmt::Print(expr) = &stmts[0] else {
            panic!("expected print");
        };
        assert_eq!(expr.id, 100);
        assert_eq!(parser.next_id(), 101);
    }

    #[test]
    fn test_class_declaration() {
        let stmts = parse("klasse B < A { init(x) { dies.x = x; } hallo() {} }");

        let Stmt::Class {
            name,
            superclass,
            methods,
        } = &stmts[0]
        else {
            panic!("expected class");
        };
        assert_eq!(name.lexeme, "B");
        assert!(matches!(&superclass.as_ref().unwrap().kind, ExprKind::Variable(t) if t.lexeme == "A"));
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].name.lexeme, "init");
        assert_eq!(methods[0].params.len(), 1);
        assert_eq!(methods[1].name.lexeme, "hallo");
    }

    #[test]
    fn test_missing_semicolon_reports_and_synchronizes() {
        let errors = parse_errors("drucke 1;\ndrucke ;\nvar x = 2\ndrucke 2;");

        assert_eq!(errors.len(), 2, "{:?}", errors);
        assert_eq!(errors[0].to_string(), "[Zeile 2] Fehler: Ausdruck erwartet.");
        assert_eq!(
            errors[1].to_string(),
            "[Zeile 4] Fehler: ';' nach Variablendeklaration erwartet."
        );
    }

    #[test]
    fn test_invalid_assignment_target() {
        let errors = parse_errors("1 + 2 = 3;");

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "[Zeile 1] Fehler: Ungültiges Zuweisungsziel."
        );
    }

    #[test]
    fn test_too_many_arguments_is_reported_once() {
        let args: Vec<String> = (0..=MAX_ARGUMENTS).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));

        let errors = parse_errors(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .to_string()
            .contains("Kann nicht mehr als 255 Argumente haben."));
    }

    #[test]
    fn test_max_arguments_is_accepted() {
        let args: Vec<String> = (0..MAX_ARGUMENTS).map(|i| i.to_string()).collect();
        let stmts = parse(&format!("f({});", args.join(", ")));

        let Stmt::Expression(expr) = &stmts[0] else {
            panic!("expected expression statement");
        };
        assert!(matches!(&expr.kind, ExprKind::Call { arguments, .. } if arguments.len() == MAX_ARGUMENTS));
    }

    #[test]
    fn test_too_many_parameters() {
        let params: Vec<String> = (0..=MAX_ARGUMENTS).map(|i| format!("p{}", i)).collect();
        let source = format!("funktion f({}) {{}}", params.join(", "));

        let errors = parse_errors(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .to_string()
            .contains("Kann nicht mehr als 255 Parameter haben."));
    }
}
