//! Remote collector sessions
//!
//! The wire protocol and transport security are entirely the implementor's
//! business; the manager only sees an opaque [`SessionProvider::Session`].

use core::future::Future;

/// Opens, uses, and closes sessions with the remote collector.
///
/// `B` is the payload type handed to [`publish`](SessionProvider::publish).
/// The manager guarantees there is at most one live session at a time, and
/// that every session returned by [`connect`](SessionProvider::connect) is
/// eventually passed to [`close`](SessionProvider::close) unless the manager
/// halts while it is open.
pub trait SessionProvider<B> {
    /// Live connection state (socket, TLS context, MQTT client, ...)
    type Session;

    /// Error reported by any session operation
    type Error: embedded_io::Error;

    /// Establish a new session.
    fn connect(&mut self) -> impl Future<Output = Result<Self::Session, Self::Error>>;

    /// Publish one payload over an open session.
    ///
    /// The payload is consumed whether or not the publish succeeds.
    fn publish(
        &mut self,
        session: &mut Self::Session,
        payload: B,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Close a session, releasing its resources.
    fn close(&mut self, session: Self::Session) -> impl Future<Output = Result<(), Self::Error>>;
}
