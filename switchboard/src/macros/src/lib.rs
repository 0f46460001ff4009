mod message;
mod reply;
mod subscriber;

use proc_macro::TokenStream;

#[proc_macro_derive(Event)]
pub fn derive_event(item: TokenStream) -> TokenStream {
    message::derive_event(item)
}

#[proc_macro_derive(Request, attributes(reply))]
pub fn derive_request(item: TokenStream) -> TokenStream {
    message::derive_request(item)
}

#[proc_macro_derive(Reply)]
pub fn derive_reply(item: TokenStream) -> TokenStream {
    reply::derive_reply(item)
}

#[proc_macro_derive(NoSubscriber, attributes(no_subscriber))]
pub fn derive_no_subscriber(item: TokenStream) -> TokenStream {
    reply::derive_no_subscriber(item)
}

#[proc_macro_derive(Subscriber, attributes(events, requests))]
pub fn derive_subscriber(item: TokenStream) -> TokenStream {
    subscriber::derive_subscriber(item)
}

/// Fails to compile if the same type appears twice in the list.
///
/// Types are compared by how they are written, so `String` and `std::string::String` count as
/// different entries.
#[proc_macro]
pub fn assert_unique_types(item: TokenStream) -> TokenStream {
    subscriber::assert_unique_types(item)
}
