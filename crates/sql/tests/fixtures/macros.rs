/// Render `$plan` for `$dialect` and compare the whole text.
macro_rules! assert_sql {
    ($plan:expr, $dialect:expr, $expected:expr $(,)?) => {
        assert_eq!(
            crate::common::render(&$plan, &$dialect),
            $expected,
            "dialect: {}",
            $dialect.name()
        )
    };
}

/// Render `$plan` for `$dialect` and check that the text contains each fragment.
macro_rules! assert_sql_contains {
    ($plan:expr, $dialect:expr, $($fragment:expr),+ $(,)?) => {{
        let sql = crate::common::render(&$plan, &$dialect);
        $(
            assert!(
                sql.contains($fragment),
                "expected {:?} in SQL for {}:\n{}",
                $fragment,
                $dialect.name(),
                sql
            );
        )+
    }};
}

/// Expect conversion for `$dialect` to fail with an error matching `$pattern`.
macro_rules! assert_sql_err {
    ($plan:expr, $dialect:expr, $pattern:pat $(,)?) => {
        match crate::common::try_render(&$plan, &$dialect) {
            Err($pattern) => {}
            other => panic!(
                "unexpected result for {}: {:?}",
                $dialect.name(),
                other
            ),
        }
    };
}
