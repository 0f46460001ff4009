/// Invoke `$m` once per tuple arity, peeling one identifier off the front each step.
#[macro_export]
#[doc(hidden)]
macro_rules! for_each_arity {
    ($m:ident !! $head:ident) => {
        $m!($head);
    };
    ($m:ident !! $head:ident, $($tail:ident),*) => (
        $m!($head, $( $tail ),*);
        $crate::for_each_arity!($m !! $( $tail ),*);
    );
}

/// Apply a macro to every tuple arity from 1 to 16.
///
/// Declaration lists (`EventSubscriber::Events`, `RequestSubscriber::Requests`) are tuples, so
/// every set trait is implemented once per arity through this macro. Sixteen message types per
/// subscriber is the ceiling; nest tuples to go further.
#[macro_export]
#[doc(hidden)]
macro_rules! all_tuples {
    ($m:ident) => {
        $crate::for_each_arity!($m !! A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P);
    };
}

#[cfg(test)]
mod tests {
    use std::any::type_name;

    trait Arity {
        fn arity() -> usize;
        fn names() -> Vec<&'static str>;
    }

    macro_rules! arity_impl {
        ($($name: ident),*) => {
            impl<$($name: 'static),*> Arity for ($($name,)*) {
                fn arity() -> usize {
                    [$(type_name::<$name>()),*].len()
                }

                fn names() -> Vec<&'static str> {
                    vec![$(type_name::<$name>()),*]
                }
            }
        }
    }

    all_tuples!(arity_impl);

    #[test]
    fn test_single_element_tuple() {
        assert_eq!(<(u8,)>::arity(), 1);
    }

    #[test]
    fn test_largest_tuple() {
        type Sixteen = (
            u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, bool, char, String, usize, isize, (),
        );
        assert_eq!(Sixteen::arity(), 16);
    }

    #[test]
    fn test_order_is_declaration_order() {
        assert_eq!(
            <(u8, String, bool)>::names(),
            vec![type_name::<u8>(), type_name::<String>(), type_name::<bool>()]
        );
    }
}
