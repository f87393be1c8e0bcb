mod utils;

const CASES: &[(&str, &str)] = &[
    (r"\d+", "123"),
    (r"\d+", "123def"),
    (r"\d+", "abc123def"),
    (r"foo", "foobar"),
    (r"foo", "foo"),
    (r"bar", "foobar"),
    (r"baz", "foobar"),
    (r"(\w+)-(\d+)", "test-42"),
    (r"(\d+)?", ""),
    (r"[a-z]{3}", "xyz"),
    (r"[a-z]{3}", "xyzw"),
    (r"invalid[", "anything"),
    (r"\d+=\d+", "124221=12323=2=abd"),
    (r"(?:ab|a)(?:bc|c)", "abc"),
    (r"(a|ab)(c|bcd)", "abcd"),
    (r"(a*)*b", "aaab"),
    (r"(a?){3}a{3}", "aaa"),
    (r"x{2,}y{0,2}", "xxxxyy"),
    (r"x{2,}y{0,2}", "xyy"),
    (r"(?i)straße", "STRASSE"),
    (r"(?i)straße", "STRAßE"),
    (r"[^a-c]+", "defa"),
    (r"\p{Greek}+\s\w", "αβγ é"),
    (r"^anchored", "anchored"),
    (r"word\b", "word"),
    (
        r"Sherlock Holmes|Shrelock Holm|John Watson|Irene Adler|Inspector Lestrade|Professor Moriarty",
        "Professor Moriarty",
    ),
    (
        r"Sherlock Holmes|Shrelock Holm|John Watson|Irene Adler|Inspector Lestrade|Professor Moriarty",
        "Shrelock Holmes",
    ),
    (
        r".*d",
        "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaad",
    ),
    (r".*d", "adadadax"),
];

#[test]
fn test_many() {
    for (pattern, input) in CASES {
        utils::check_all_engines(pattern, input);
    }
}
