use super::*;
use crate::util::schedule::ManualScheduler;
use std::cell::RefCell;

fn setup() -> (ManualScheduler, SearchTrigger, Rc<RefCell<Vec<String>>>) {
    let scheduler = ManualScheduler::new();
    let dispatched = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&dispatched);
    let trigger = SearchTrigger::new(
        Rc::new(scheduler.clone()),
        Duration::from_millis(300),
        2,
        Rc::new(move |query: String| sink.borrow_mut().push(query)),
    );
    (scheduler, trigger, dispatched)
}

#[test]
fn keystrokes_within_quiet_period_dispatch_last_text_once() {
    let (scheduler, trigger, dispatched) = setup();
    for text in ["no", "not", "note", "noteb"] {
        trigger.input(text);
        scheduler.advance_ms(299);
    }
    assert!(dispatched.borrow().is_empty());

    scheduler.advance_ms(1);
    assert_eq!(*dispatched.borrow(), vec!["noteb".to_owned()]);
    scheduler.advance_ms(5_000);
    assert_eq!(dispatched.borrow().len(), 1);
}

#[test]
fn short_queries_never_auto_dispatch() {
    let (scheduler, trigger, dispatched) = setup();
    assert!(!trigger.input("a"));
    assert!(!trigger.input("  b  "));
    scheduler.advance_ms(1_000);
    assert!(dispatched.borrow().is_empty());
}

#[test]
fn qualifying_query_dispatches_exactly_at_quiet_period() {
    let (scheduler, trigger, dispatched) = setup();
    assert!(trigger.input("  ml  "));
    scheduler.advance_ms(299);
    assert!(dispatched.borrow().is_empty());
    scheduler.advance_ms(1);
    assert_eq!(*dispatched.borrow(), vec!["ml".to_owned()]);
}

#[test]
fn shrinking_below_floor_cancels_pending_dispatch() {
    let (scheduler, trigger, dispatched) = setup();
    trigger.input("py");
    scheduler.advance_ms(100);
    trigger.input("p");
    assert!(!trigger.is_pending());
    scheduler.advance_ms(1_000);
    assert!(dispatched.borrow().is_empty());
}

#[test]
fn commit_dispatches_immediately_and_cancels_pending() {
    let (scheduler, trigger, dispatched) = setup();
    trigger.input("pandas");
    scheduler.advance_ms(100);
    trigger.commit(" pandas ");
    assert_eq!(*dispatched.borrow(), vec!["pandas".to_owned()]);

    scheduler.advance_ms(1_000);
    assert_eq!(dispatched.borrow().len(), 1);
}

#[test]
fn commit_ignores_length_floor() {
    let (_scheduler, trigger, dispatched) = setup();
    trigger.commit("a");
    trigger.commit("   ");
    assert_eq!(*dispatched.borrow(), vec!["a".to_owned(), String::new()]);
}

#[test]
fn length_counts_characters_not_bytes() {
    let (scheduler, trigger, dispatched) = setup();
    assert!(!trigger.input("é"));
    assert!(trigger.input("日本"));
    scheduler.advance_ms(300);
    assert_eq!(*dispatched.borrow(), vec!["日本".to_owned()]);
}

#[test]
fn typing_bit_over_250ms_then_pausing_dispatches_once() {
    let (scheduler, trigger, dispatched) = setup();
    trigger.input("b");
    scheduler.advance_ms(125);
    trigger.input("bi");
    scheduler.advance_ms(125);
    trigger.input("bit");
    scheduler.advance_ms(350);
    assert_eq!(*dispatched.borrow(), vec!["bit".to_owned()]);
}

#[test]
fn single_char_then_long_pause_dispatches_nothing() {
    let (scheduler, trigger, dispatched) = setup();
    trigger.input("a");
    scheduler.advance_ms(1_000);
    assert!(dispatched.borrow().is_empty());
}

#[test]
fn enter_commits_only_outside_composition() {
    assert!(is_commit_key("Enter", false));
    assert!(!is_commit_key("Enter", true));
    assert!(!is_commit_key("a", false));
    assert!(!is_commit_key("Process", true));
}
