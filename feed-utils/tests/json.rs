use feed_structs::{Event, Solution};
use feed_utils::{dejsonify, jsonify};

#[test]
fn test_jsonify_sorts_keys() {
    let solution = Solution {
        value: 16,
        weight: 10,
        ids: vec![1, 2],
    };
    assert_eq!(
        jsonify(&solution).unwrap(),
        r#"{"ids":[1,2],"value":16,"weight":10}"#
    );
    let event = Event::Reload { timestamp: 7 };
    assert_eq!(jsonify(&event).unwrap(), r#"{"timestamp":7,"type":"reload"}"#);
}

#[test]
fn test_dejsonify() {
    let solution: Solution = dejsonify(r#"{"value":3,"weight":2,"ids":[4]}"#).unwrap();
    assert_eq!(solution.ids, vec![4]);
    assert!(dejsonify::<Solution>("{").is_err());
}
