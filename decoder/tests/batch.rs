use mt940_decoder::{parse_batch, parse_statement, ParseError};

const FIRST: &str = "\
:20:FIRST
:25:TR330006100519786457841326
:60F:C240301TRY100,00
:61:240301C10,00NTRF
:86:bir
:62F:C240301TRY110,00
";

const THIRD: &str = "\
:20:THIRD
:25:TR330046100519786457841326
:61:240302D5,00NCOM
";

#[test]
fn batch_isolates_failures() {
    let inputs: Vec<(&[u8], &str)> = vec![
        (FIRST.as_bytes(), "first.sta"),
        (&b""[..], "second.sta"),
        (THIRD.as_bytes(), "third.sta"),
    ];

    let outcome = parse_batch(inputs);

    assert_eq!(outcome.parsed.len(), 2);
    assert_eq!(outcome.failed.len(), 1);

    let (label, err) = &outcome.failed[0];
    assert_eq!(label, "second.sta");
    assert!(matches!(err, ParseError::EmptyInput { .. }), "got {err:?}");

    // соседние файлы разобраны так же, как по отдельности
    assert_eq!(
        outcome.parsed[0],
        parse_statement(FIRST.as_bytes(), "first.sta").unwrap()
    );
    assert_eq!(
        outcome.parsed[1],
        parse_statement(THIRD.as_bytes(), "third.sta").unwrap()
    );
}

#[test]
fn batch_preserves_order_within_each_list() {
    let outcome = parse_batch(vec![
        (b"garbage".to_vec(), "a"),
        (THIRD.as_bytes().to_vec(), "b"),
        (Vec::new(), "c"),
        (FIRST.as_bytes().to_vec(), "d"),
    ]);

    let refs: Vec<&str> = outcome
        .parsed
        .iter()
        .map(|s| s.header().transaction_ref.as_str())
        .collect();
    assert_eq!(refs, vec!["THIRD", "FIRST"]);

    let labels: Vec<&str> = outcome.failed.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["a", "c"]);
}

#[test]
fn statements_parse_concurrently() {
    let inputs = [FIRST, THIRD, FIRST];

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| s.spawn(move || parse_statement(input.as_bytes(), &format!("f{i}"))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(
        results[0].as_ref().unwrap(),
        results[2].as_ref().unwrap()
    );
}
