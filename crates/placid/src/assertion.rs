//! Fluent assertions bound to one subject.

use crate::case::Expect;
use crate::compare::{are_equal, are_the_same, is_empty, is_nil, panics};
use crate::value::Inspect;

/// An assertion about `subject`, created by [`Expect::that`].
///
/// A failed predicate reports one message to the case's reporter and
/// returns normally; the body keeps running. Every method records the
/// caller's location for the report.
pub struct Assertion<'e, T> {
    subject: T,
    owner: &'e Expect<'e>,
}

impl<'e, T> Assertion<'e, T> {
    pub(crate) fn new(owner: &'e Expect<'e>, subject: T) -> Self {
        Assertion { subject, owner }
    }
}

impl<T: Inspect> Assertion<'_, T> {
    /// The subject equals `expected`, converting the subject to the expected
    /// type when the types differ (`5` equals `5.0`).
    #[track_caller]
    pub fn to_equal<U: Inspect>(&self, expected: U) -> &Self {
        let (actual, expected) = (self.subject.to_value(), expected.to_value());
        if !are_equal(&actual, &expected) {
            self.owner
                .fail(format!("Expected `{actual}` to equal `{expected}`"));
        }
        self
    }

    /// Alias for [`to_equal`](Self::to_equal).
    #[track_caller]
    pub fn to_be<U: Inspect>(&self, expected: U) -> &Self {
        self.to_equal(expected)
    }

    #[track_caller]
    pub fn to_not_equal<U: Inspect>(&self, expected: U) -> &Self {
        let (actual, expected) = (self.subject.to_value(), expected.to_value());
        if are_equal(&actual, &expected) {
            self.owner
                .fail(format!("Expected `{actual}` to not equal `{expected}`"));
        }
        self
    }

    /// Alias for [`to_not_equal`](Self::to_not_equal).
    #[track_caller]
    pub fn to_not_be<U: Inspect>(&self, expected: U) -> &Self {
        self.to_not_equal(expected)
    }

    #[track_caller]
    pub fn to_be_true(&self) -> &Self {
        self.to_equal(true)
    }

    #[track_caller]
    pub fn to_be_false(&self) -> &Self {
        self.to_equal(false)
    }

    /// Equal and of the identical type: `5i32` is not the same as `5i64`.
    #[track_caller]
    pub fn to_be_the_same<U: Inspect>(&self, expected: U) -> &Self {
        if !are_the_same(&self.subject, &expected) {
            self.owner.fail(format!(
                "Expected `{}` to be the same as `{}`",
                self.subject.to_value(),
                expected.to_value()
            ));
        }
        self
    }

    #[track_caller]
    pub fn to_not_be_the_same<U: Inspect>(&self, expected: U) -> &Self {
        if are_the_same(&self.subject, &expected) {
            self.owner.fail(format!(
                "Expected `{}` to not be the same as `{}`",
                self.subject.to_value(),
                expected.to_value()
            ));
        }
        self
    }

    /// The subject is [`Nil`](crate::Nil) or an empty pointer such as `None`.
    #[track_caller]
    pub fn to_be_nil(&self) -> &Self {
        let actual = self.subject.to_value();
        if !is_nil(&actual) {
            self.owner.fail(format!("Expected `{actual}` to not exist"));
        }
        self
    }

    #[track_caller]
    pub fn to_not_be_nil(&self) -> &Self {
        let actual = self.subject.to_value();
        if is_nil(&actual) {
            self.owner.fail(format!("Expected `{actual}` to exist"));
        }
        self
    }

    /// Empty values: nil, `""`, `false`, zero, empty collections and a
    /// pointer to the Unix epoch.
    #[track_caller]
    pub fn to_be_empty(&self) -> &Self {
        let actual = self.subject.to_value();
        if !is_empty(&actual) {
            self.owner.fail(format!("Expected `{actual}` to be empty"));
        }
        self
    }

    #[track_caller]
    pub fn to_not_be_empty(&self) -> &Self {
        let actual = self.subject.to_value();
        if is_empty(&actual) {
            self.owner.fail(format!("Expected `{actual}` to not be empty"));
        }
        self
    }
}

impl<F: FnOnce()> Assertion<'_, F> {
    /// Call the subject; it must panic. The panic payload is discarded.
    #[track_caller]
    pub fn to_panic(self) {
        if !panics(self.subject) {
            self.owner.fail("Expected panic".to_string());
        }
    }

    /// Call the subject; it must return normally.
    #[track_caller]
    pub fn to_not_panic(self) {
        if panics(self.subject) {
            self.owner.fail("Expected not to panic".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::report::Recorder;
    use crate::value::Nil;
    use crate::Expect;
    use pretty_assertions::assert_eq;

    fn with_expect(body: impl FnOnce(&Expect<'_>)) -> Vec<String> {
        let recorder = Recorder::new();
        let expect = Expect::new("subject", &recorder);
        body(&expect);
        assert_eq!(expect.failures(), recorder.len());
        recorder.messages()
    }

    #[test]
    fn test_passing_assertions_report_nothing() {
        let messages = with_expect(|expect| {
            expect.that(5).to_equal(5.0).to_be(5i64).to_not_equal(6);
            expect.that(true).to_be_true();
            expect.that(false).to_be_false();
            expect.that("x").to_be_the_same("x").to_not_be_the_same("y");
            expect.that(Nil).to_be_nil();
            expect.that(Some(1)).to_not_be_nil();
            expect.that(Vec::<i32>::new()).to_be_empty();
            expect.that(vec![1]).to_not_be_empty();
            expect.that(|| panic!("boom")).to_panic();
            expect.that(|| {}).to_not_panic();
        });
        assert!(messages.is_empty(), "unexpected failures: {messages:?}");
    }

    #[test]
    fn test_failure_messages() {
        let messages = with_expect(|expect| {
            expect.that(1).to_equal(2);
            expect.that(1).to_not_equal(1.0);
            expect.that(5).to_be_the_same(5.0);
            expect.that(5).to_not_be_the_same(5);
            expect.that(0).to_be_nil();
            expect.that(None::<u8>).to_not_be_nil();
            expect.that("0").to_be_empty();
            expect.that("").to_not_be_empty();
            expect.that(|| {}).to_panic();
            expect.that(|| panic!("boom")).to_not_panic();
        });
        assert_eq!(
            messages,
            vec![
                "Expected `1` to equal `2`",
                "Expected `1` to not equal `1.0`",
                "Expected `5` to be the same as `5.0`",
                "Expected `5` to not be the same as `5`",
                "Expected `0` to not exist",
                "Expected `None` to exist",
                "Expected `\"0\"` to be empty",
                "Expected `\"\"` to not be empty",
                "Expected panic",
                "Expected not to panic",
            ]
        );
    }

    #[test]
    fn test_equal_and_not_equal_are_negations() {
        let pairs: [(&str, fn(&Expect<'_>, bool)); 6] = [
            ("1u8 vs 1i64", |e, neg| check(e, neg, 1u8, 1i64)),
            ("a vs b", |e, neg| check(e, neg, "a", "b")),
            ("vec", |e, neg| check(e, neg, vec![1], vec![1])),
            ("nil vs 0", |e, neg| check(e, neg, Nil, 0)),
            ("2.5 vs 2", |e, neg| check(e, neg, 2.5, 2)),
            ("[] vs \"\"", |e, neg| check(e, neg, Vec::<i32>::new(), "")),
        ];
        for (label, run) in pairs {
            let positive = with_expect(|e| run(e, false)).len();
            let negative = with_expect(|e| run(e, true)).len();
            assert_eq!(positive + negative, 1, "{label}");
        }
    }

    fn check<A: crate::Inspect, B: crate::Inspect>(expect: &Expect<'_>, negate: bool, a: A, b: B) {
        if negate {
            expect.that(a).to_not_equal(b);
        } else {
            expect.that(a).to_equal(b);
        }
    }

    #[test]
    fn test_closures_equal_only_when_identical() {
        let messages = with_expect(|expect| {
            let quiet: Box<dyn Fn()> = Box::new(|| {});
            let loud: Box<dyn Fn()> = Box::new(|| panic!("loud"));
            expect.that(&quiet).to_not_equal(&loud);
            expect.that(&quiet).to_not_be_the_same(&loud);

            let n = 3u32;
            let counting: Box<dyn Fn()> = Box::new(move || assert!(n > 0));
            expect.that(&counting).to_equal(&counting);
        });
        assert!(messages.is_empty(), "unexpected failures: {messages:?}");
    }

    #[test]
    fn test_same_implies_equal() {
        let messages = with_expect(|expect| {
            expect.that(5i32).to_equal(5i64);
            expect.that(5i32).to_be_the_same(5i64);
        });
        assert_eq!(messages, vec!["Expected `5` to be the same as `5`"]);
    }
}
