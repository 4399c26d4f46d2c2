mod common;

#[cfg(test)]
mod source_file_tests {
    use std::fs;
    use std::path::PathBuf;

    use dlox::error::LoxError;
    use dlox::runner::read_source;

    use crate::common::run_ok;

    fn temp_script(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("dlox-{}-{}.lox", std::process::id(), name));
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_reads_utf8_script() {
        let path = temp_script("gruss", "drucke \"Grüße\";\n".as_bytes());

        let source = read_source(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(run_ok(&source), vec!["Grüße"]);
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let path = temp_script("kaputt", &[b'd', b'r', 0xff, 0xfe, b';']);

        let err = read_source(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(matches!(err, LoxError::Utf8(_)), "got {:?}", err);
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("dlox-gibt-es-nicht/skript.lox");

        let err = read_source(&path).unwrap_err();

        assert!(matches!(err, LoxError::Io(_)), "got {:?}", err);
        assert_eq!(err.line(), None);
    }
}
