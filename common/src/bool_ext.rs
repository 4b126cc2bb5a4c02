pub trait BoolExt {
    fn then_else<T>(self, when_true: T, when_false: T) -> T;
}

impl BoolExt for bool {
    fn then_else<T>(self, when_true: T, when_false: T) -> T {
        if self { when_true } else { when_false }
    }
}
