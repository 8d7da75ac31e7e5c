use super::*;
use crate::bind::{
    bind_fn, bind_method, bind_method_mut, bind_mut, bind_ptr, bind_ref, bind_stateless,
    bind_value,
};
use assert_matches::assert_matches;
use quickcheck_macros::quickcheck;
use std::cell::Cell;

fn square(x: i32) -> i32 {
    x * x
}

fn cube(x: i32) -> i32 {
    x * x * x
}

fn square_out(x: i32, out: &mut i32) {
    *out = x * x;
}

fn square_store(x: i32, out: &mut i32) -> i32 {
    *out = x * x;
    *out
}

extern "C" fn negate(x: i32) -> i32 {
    -x
}

struct Adder {
    x: i32,
}

impl Adder {
    fn add(&self, y: i32) -> i32 {
        self.x + y
    }

    fn sub(&self, y: i32) -> i32 {
        self.x - y
    }

    fn add_out(&self, y: i32, out: &mut i32) {
        *out = self.x + y;
    }

    fn set(&mut self, x: i32) -> i32 {
        let old = self.x;
        self.x = x;
        old
    }
}

/// A default-constructible callable with no state
#[derive(Default, Clone, Copy)]
struct Fnv1a;

impl Callable<(&'static [u8],)> for Fnv1a {
    type Output = u32;

    fn invoke(&self, (bytes,): (&'static [u8],)) -> u32 {
        bytes
            .iter()
            .fold(0x811c9dc5, |h, &b| (h ^ b as u32).wrapping_mul(0x01000193))
    }
}

#[test]
fn empty() {
    let _ = env_logger::builder().is_test(true).try_init();

    const EMPTY: Delegate<'static, (i32,), i32> = Delegate::INIT;
    for d in [EMPTY, Delegate::new(), Delegate::default()] {
        assert!(!d.is_bound());
        assert!(!d.has_target());
        assert_eq!(d.target_kind(), None);
        assert!(!d.raw().is_bound());
        assert_eq!(d.call(1), Err(BadDelegateCall));
        assert!(!d.has_fn(square));
        assert!(!d.has_ref(&square));
    }
}

#[test]
fn function() {
    let mut d: Delegate<(i32,), i32> = bind_fn(square).into();
    assert_matches!(d.target_kind(), Some(TargetKind::Function));
    assert!(d.raw().context().is_null());
    assert_eq!(d.call(7), Ok(49));
    assert_eq!(d.invoke((-3,)), Ok(9));
    assert!(d.has_fn(square));
    assert!(!d.has_fn(cube));

    d.set(bind_fn(cube));
    assert_eq!(d.call(3), Ok(27));
    assert!(d.has_fn(cube));
    assert!(!d.has_fn(square));
}

#[test]
fn function_widening() {
    let d: Delegate<(i16,), i64> = bind_fn(square).into();
    assert_eq!(d.call(-300), Ok(90000));

    let d: Delegate<(u8, u8), f64> = bind_fn(|a: u16, b: u32| a as u32 * b).into();
    assert_eq!(d.call(255, 255), Ok(65025.0));
}

#[test]
fn function_out_param() {
    let mut output = 0;
    let d: Delegate<(i32, &mut i32)> = bind_fn(square_out).into();
    d.call(5, &mut output).unwrap();
    assert_eq!(output, 25);

    // The return value is dropped
    let d: Delegate<(i32, &mut i32)> = bind_fn(square_store).discard().into();
    d.call(6, &mut output).unwrap();
    assert_eq!(output, 36);
}

#[test]
fn in_place_param() {
    fn square_in_place(x: &mut i32) -> i32 {
        *x *= *x;
        *x
    }

    let mut value = 12;
    let d: Delegate<(&mut i32,)> = bind_fn(square_in_place).discard().into();
    assert_eq!(d.call(&mut value), Ok(()));
    assert_eq!(value, 144);
}

#[test]
fn raw_out_param() {
    fn square_raw(x: i32, out: *mut i32) -> i32 {
        // Safety: The caller passes a valid pointer
        unsafe { *out = x * x };
        x
    }

    let mut output = 0;
    let d: Delegate<(i32, *mut i32)> = bind_fn(square_raw).discard().into();
    d.call(9, &mut output).unwrap();
    assert_eq!(output, 81);
}

#[test]
fn reset_closure_by_ref() {
    let _ = env_logger::builder().is_test(true).try_init();

    let called = Cell::new(0);
    let notify = || called.set(called.get() + 1);

    let mut d: Delegate<()> = bind_ref(&notify).into();
    assert_eq!(d.call(), Ok(()));
    assert_eq!(called.get(), 1);

    d.reset();
    assert_matches!(d.call(), Err(BadDelegateCall));
    assert_eq!(called.get(), 1);
}

#[test]
fn function_pointer_identity_is_distinct() {
    let d: Delegate<(i32,), i32> = bind_fn(square).into();
    assert!(d.has_fn(square));
    assert!(!d.has_ptr(square as fn(i32) -> i32));

    let d: Delegate<(i32,), i32> = bind_ptr(square as fn(i32) -> i32).into();
    assert!(d.has_ptr(square as fn(i32) -> i32));
    assert!(!d.has_fn(square));
}

#[test]
fn method() {
    let a = Adder { x: 42 };
    let b = Adder { x: 10 };

    let mut d: Delegate<(i32,), i32> = bind_method(Adder::add, &a).into();
    assert_matches!(d.target_kind(), Some(TargetKind::Method));
    assert_eq!(d.call(2), Ok(44));
    assert!(d.has_method(Adder::add, &a));
    assert!(!d.has_method(Adder::add, &b));
    assert!(!d.has_method(Adder::sub, &a));

    d.set(bind_method(Adder::sub, &b));
    assert_eq!(d.call(2), Ok(8));
    assert!(d.has_method(Adder::sub, &b));
    assert!(!d.has_method(Adder::sub, &a));
}

#[test]
fn method_out_param() {
    let a = Adder { x: 42 };
    let mut output = 0;
    let d: Delegate<(i32, &mut i32)> = bind_method(Adder::add_out, &a).into();
    d.call(1, &mut output).unwrap();
    assert_eq!(output, 43);
}

#[test]
fn method_discard() {
    let a = Adder { x: 1 };
    let d: Delegate<(i32,)> = bind_method(Adder::add, &a).discard().into();
    assert_eq!(d.call(1), Ok(()));
}

#[test]
fn method_mut() {
    let mut a = Adder { x: 1 };
    let pa: *const Adder = &a;
    {
        let d: Delegate<(i32,), i64> = unsafe { bind_method_mut(Adder::set, &mut a) }.into();
        assert_matches!(d.target_kind(), Some(TargetKind::MethodMut));
        assert!(d.has_method(Adder::set, pa));
        assert!(!d.has_method(Adder::add, pa));
        assert_eq!(d.call(5), Ok(1));
        assert_eq!(d.call(9), Ok(5));
    }
    assert_eq!(a.x, 9);
}

#[test]
fn stateless() {
    let d: Delegate<(&'static [u8],), u64> = bind_stateless::<Fnv1a, _>().into();
    assert_matches!(d.target_kind(), Some(TargetKind::Stateless));
    assert_eq!(d.call(b""), Ok(0x811c9dc5));
    assert_eq!(d.call(b"a"), Ok(0xe40c292c));
    assert!(d.has_stateless::<Fnv1a>());
    assert!(!d.has_value(&Fnv1a));
}

#[test]
fn value() {
    let offset = |x: i32| x + 100;
    let d: Delegate<(i32,), i32> = bind_value(offset).into();
    assert_matches!(d.target_kind(), Some(TargetKind::Value));
    assert_eq!(d.call(1), Ok(101));
    assert!(d.has_value(&offset));
    assert!(!d.has_fn(offset));

    let d: Delegate<(&'static [u8],), u32> = bind_value(Fnv1a).into();
    assert!(d.has_value(&Fnv1a));
    assert!(!d.has_stateless::<Fnv1a>());
}

#[test]
fn by_ref() {
    let x = Cell::new(1);
    let add_x = |y: i32| x.get() + y;
    let other = |y: i32| y;

    let d: Delegate<(i32,), i32> = bind_ref(&add_x).into();
    assert_matches!(d.target_kind(), Some(TargetKind::Ref));
    assert!(d.raw().context().addr_eq(&add_x));
    assert_eq!(d.call(1), Ok(2));
    x.set(100);
    assert_eq!(d.call(1), Ok(101));

    assert!(d.has_ref(&add_x));
    assert!(!d.has_ref(&other));
}

#[test]
fn by_ref_zero_sized() {
    // Zero-sized callables may share an address
    let a = |y: i32| y + 1;
    let b = |y: i32| y * 100;

    let d: Delegate<(i32,), i32> = bind_ref(&a).into();
    assert_eq!(d.call(1), Ok(2));
    assert!(d.has_ref(&a));
    assert!(!d.has_ref(&b));

    let d: Delegate<(i32,), i32> = bind_ref(&b).into();
    assert!(d.has_ref(&b));
    assert!(!d.has_ref(&a));
}

#[test]
fn by_mut_zero_sized() {
    let mut a = |y: i32| y + 1;
    let b = |y: i32| y * 100;
    let pa: *const _ = &a;

    let d: Delegate<(i32,), i32> = unsafe { bind_mut(&mut a) }.into();
    assert!(d.has_ref(pa));
    assert!(!d.has_ref(&b));
    assert_eq!(d.call(1), Ok(2));
}

#[test]
fn method_zero_sized_receiver() {
    struct Unit;

    impl Unit {
        fn one(&self) -> i32 {
            1
        }

        fn two(&self) -> i32 {
            2
        }
    }

    struct OtherUnit;

    impl OtherUnit {
        fn one(&self) -> i32 {
            -1
        }
    }

    let u = Unit;
    let v = OtherUnit;
    let d: Delegate<(), i32> = bind_method(Unit::one, &u).into();
    assert_eq!(d.call(), Ok(1));
    assert!(d.has_method(Unit::one, &u));
    assert!(!d.has_method(Unit::two, &u));
    assert!(!d.has_method(OtherUnit::one, &v));
}

#[test]
fn by_mut() {
    let mut log = Vec::new();
    {
        let mut push = |x: u8| {
            log.push(x);
            log.len()
        };
        let p: *const _ = &push;
        let d: Delegate<(u8,), usize> = unsafe { bind_mut(&mut push) }.into();
        assert_matches!(d.target_kind(), Some(TargetKind::RefMut));
        assert!(d.has_ref(p));
        assert_eq!(d.call(3), Ok(1));
        assert_eq!(d.call(1), Ok(2));
        assert_eq!(d.call(4), Ok(3));
    }
    assert_eq!(log, [3, 1, 4]);
}

#[test]
fn pointer() {
    let p = cube as fn(i32) -> i32;
    let d: Delegate<(i32,), i64> = bind_ptr(p).into();
    assert_matches!(d.target_kind(), Some(TargetKind::Pointer));
    assert_eq!(d.call(-2), Ok(-8));
    assert!(d.has_ptr(p));
    assert!(!d.has_ptr(square as fn(i32) -> i32));

    let d: Delegate<(i16,), i32> = bind_ptr(negate as extern "C" fn(i32) -> i32).into();
    assert_eq!(d.call(5), Ok(-5));
    assert!(d.has_ptr(negate as extern "C" fn(i32) -> i32));
}

#[test]
fn kinds_are_not_interchangeable() {
    let a = Adder { x: 0 };
    let by_fn: Delegate<(i32,), i32> = bind_fn(square).into();
    let by_value: Delegate<(i32,), i32> = bind_value(square).into();
    let sq = square;
    let by_ref: Delegate<(i32,), i32> = bind_ref(&sq).into();
    let by_method: Delegate<(i32,), i32> = bind_method(Adder::add, &a).into();

    assert!(by_fn.has_fn(square) && !by_fn.has_value(&square));
    assert!(by_value.has_value(&square) && !by_value.has_fn(square));
    assert!(by_ref.has_ref(&sq) && !by_ref.has_fn(square));
    assert!(!by_method.has_ref(&a));

    // They all call the same thing
    for d in [by_fn, by_value, by_ref] {
        assert_eq!(d.call(4), Ok(16));
    }
}

#[test]
fn reset() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut d: Delegate<(i32,), i32> = bind_fn(square).into();
    d.reset();
    assert!(!d.is_bound());
    assert!(!d.has_fn(square));
    assert_eq!(d.call(1), Err(BadDelegateCall));

    // Resetting an empty delegate does nothing
    d.reset();
    assert!(!d.is_bound());

    d.set(bind_fn(cube));
    assert_eq!(d.call(2), Ok(8));
}

#[test]
fn take() {
    let mut d: Delegate<(i32,), i32> = bind_fn(square).into();
    let taken = d.take();
    assert!(!d.is_bound());
    assert!(taken.has_fn(square));
    assert_eq!(taken.call(3), Ok(9));
}

#[test]
fn copies_share_target() {
    let x = Cell::new(0);
    let bump = |y: i32| x.set(x.get() + y);

    let d1: Delegate<(i32,)> = bind_ref(&bump).into();
    let mut d2 = d1;
    d1.call(1).unwrap();
    d2.call(2).unwrap();
    assert_eq!(x.get(), 3);

    // Resetting a copy doesn't affect the original
    d2.reset();
    assert!(d1.has_ref(&bump));
    assert!(!d2.is_bound());
}

#[test]
fn move_only_values() {
    let d: Delegate<(Option<Box<i32>>,), i32> =
        bind_fn(|b: Option<Box<i32>>| b.map_or(-1, |b| *b)).into();
    assert_eq!(d.call(Some(Box::new(5))), Ok(5));
    assert_eq!(d.call(None), Ok(-1));

    // An explicitly moved handle
    let handle = Some(Box::new(7));
    assert_eq!(d.call(handle), Ok(7));

    let d: Delegate<(), Box<i32>> = bind_fn(|| Box::new(42)).into();
    assert_eq!(d.call().map(|b| *b), Ok(42));
}

#[test]
fn twelve_args() {
    fn sum(
        a: u8,
        b: u8,
        c: u8,
        d: u8,
        e: u8,
        f: u8,
        g: u8,
        h: u8,
        i: u8,
        j: u8,
        k: u8,
        l: u8,
    ) -> u32 {
        [a, b, c, d, e, f, g, h, i, j, k, l]
            .iter()
            .map(|&x| x as u32)
            .sum()
    }

    let d: Delegate<(u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8), u64> = bind_fn(sum).into();
    assert_eq!(d.call(1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12), Ok(78));
}

#[test]
fn panics_propagate() {
    let d: Delegate<(i32,), i32> = bind_fn(|x: i32| -> i32 { panic!("{x}") }).into();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| d.call(7)));
    assert!(result.is_err());
}

#[test]
fn detach() {
    struct Holder {
        callback: Delegate<'static, (i32,), i32>,
    }

    let a = Adder { x: 5 };
    let holder = Holder {
        // Safety: `a` outlives `holder`
        callback: unsafe { Delegate::from(bind_method(Adder::add, &a)).detach() },
    };
    assert_eq!(holder.callback.call(1), Ok(6));
    assert!(holder.callback.has_method(Adder::add, &a));
}

#[test]
fn debug() {
    let d: Delegate<(i32,), i32> = bind_fn(square).into();
    let s = format!("{d:?}");
    assert!(s.contains("Function"), "{s}");

    let d: Delegate<(i32,), i32> = Delegate::new();
    assert!(format!("{d:?}").contains("None"));
}

#[test]
fn error_display() {
    let d: Delegate<()> = Delegate::new();
    let e = d.call().unwrap_err();
    assert_eq!(e.to_string(), "invoked a delegate with no target bound");
    assert_eq!(format!("{e:?}"), "BadDelegateCall");
}

#[quickcheck]
fn widened_call_matches_direct_call(x: i16, y: i16) -> bool {
    let mul = |a: i32, b: i32| a * b;
    let d: Delegate<(i16, i16), i64> = bind_fn(mul).into();
    d.call(x, y) == Ok(mul(x as i32, y as i32) as i64)
}

#[quickcheck]
fn ref_target_accumulates(values: Vec<i32>) -> bool {
    let a = Cell::new(0i32);
    let add = |y: i32| a.set(a.get().wrapping_add(y));
    let d: Delegate<(i32,)> = bind_ref(&add).into();
    for &v in &values {
        d.call(v).unwrap();
    }
    a.get() == values.iter().fold(0i32, |acc, &v| acc.wrapping_add(v))
}
