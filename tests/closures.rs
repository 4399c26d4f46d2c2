mod common;

#[cfg(test)]
mod closure_tests {
    use crate::common::run_ok;

    #[test]
    fn test_counter_keeps_private_state() {
        assert_eq!(
            run_ok(
                "funktion macheZähler() {
                     var i = 0;
                     funktion zähle() { i = i + 1; zurückgeben i; }
                     zurückgeben zähle;
                 }
                 var a = macheZähler();
                 var b = macheZähler();
                 drucke a(); drucke a(); drucke b(); drucke a();"
            ),
            vec!["1", "2", "1", "3"]
        );
    }

    #[test]
    fn test_closures_share_the_captured_binding() {
        assert_eq!(
            run_ok(
                "var lesen; var schreiben;
                 {
                     var geteilt = \"alt\";
                     funktion l() { zurückgeben geteilt; }
                     funktion s(v) { geteilt = v; }
                     lesen = l; schreiben = s;
                 }
                 schreiben(\"neu\");
                 drucke lesen();"
            ),
            vec!["neu"]
        );
    }

    #[test]
    fn test_body_declarations_are_fresh_each_iteration() {
        assert_eq!(
            run_ok(
                "var erste; var zweite;
                 für (var i = 0; i < 2; i = i + 1) {
                     var kopie = i;
                     funktion f() { zurückgeben kopie; }
                     wenn (i == 0) erste = f; sonst zweite = f;
                 }
                 drucke erste(); drucke zweite();"
            ),
            vec!["0", "1"]
        );
    }

    #[test]
    fn test_loop_variable_is_shared_across_iterations() {
        assert_eq!(
            run_ok(
                "var f;
                 für (var i = 0; i < 3; i = i + 1) {
                     wenn (i == 0) { funktion g() { zurückgeben i; } f = g; }
                 }
                 drucke f();"
            ),
            vec!["3"]
        );
    }

    #[test]
    fn test_closures_from_every_pass_see_the_final_loop_value() {
        assert_eq!(
            run_ok(
                "var a; var b;
                 für (var i = 0; i < 2; i = i + 1) {
                     funktion f() { zurückgeben i; }
                     wenn (i == 0) a = f; sonst b = f;
                 }
                 drucke a(); drucke b();"
            ),
            vec!["2", "2"]
        );
    }

    #[test]
    fn test_resolution_is_static_not_dynamic() {
        assert_eq!(
            run_ok(
                "var a = \"global\";
                 {
                     funktion zeige() { drucke a; }
                     zeige();
                     var a = \"block\";
                     zeige();
                 }"
            ),
            vec!["global", "global"]
        );
    }

    #[test]
    fn test_closure_outlives_its_scope() {
        assert_eq!(
            run_ok(
                "funktion addierer(n) {
                     funktion add(x) { zurückgeben x + n; }
                     zurückgeben add;
                 }
                 var plus5 = addierer(5);
                 drucke plus5(10);
                 drucke addierer(1)(1);"
            ),
            vec!["15", "2"]
        );
    }
}
