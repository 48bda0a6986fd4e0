use embedded_hal_0_2::timer::CountDown;
use heapless::Vec;

use crate::keyboard::{KeySwitchIdentifier, KeySwitches};
use crate::log;
use crate::split::{Connection, SplitCommunicator, SplitState};
use crate::time::Duration;

/// The switches of both halves. `K` scans this half, the other half's
/// switches come over `C`.
pub struct SplitKeySwitches<
    const SZ: usize,
    const RO: usize,
    C: Connection,
    K: KeySwitches<SZ, RO>,
    T: CountDown<Time = Duration>,
> {
    communicator: SplitCommunicator<SZ, RO, K::Identifier, C, T>,
    switches: Vec<K::Identifier, RO>,
    underlying_switches: K,
    is_left: bool,
}

impl<
        const SZ: usize,
        const RO: usize,
        C: Connection,
        K: KeySwitches<SZ, RO>,
        T: CountDown<Time = Duration>,
    > SplitKeySwitches<SZ, RO, C, K, T>
{
    pub fn new(key_switches: K, connection: C, timer: T, timeout: Duration, is_left: bool) -> Self {
        SplitKeySwitches {
            communicator: SplitCommunicator::new(connection, timer, timeout),
            switches: Vec::new(),
            underlying_switches: key_switches,
            is_left,
        }
    }

    /// Answers the other half. Call it when data arrives on the link.
    pub fn poll(&mut self) {
        self.communicator.respond(&self.switches);
    }

    pub fn state(&self) -> SplitState {
        self.communicator.state()
    }

    fn establish(&mut self) {
        if let Err(e) = self.communicator.establish() {
            log::warn!("failed to establish split connection: {:?}", e);
        }
    }

    fn scan_both(&mut self) -> Vec<SplitKeySwitchIdentifier<SZ, K::Identifier>, RO> {
        if self.is_left && self.communicator.state() == SplitState::Undetermined {
            self.establish();
        }
        self.switches = self.underlying_switches.scan();
        let far_side = self.communicator.request(&self.switches);

        let (near, far): (
            fn(K::Identifier) -> SplitKeySwitchIdentifier<SZ, K::Identifier>,
            fn(K::Identifier) -> SplitKeySwitchIdentifier<SZ, K::Identifier>,
        ) = if self.is_left {
            (SplitKeySwitchIdentifier::Left, SplitKeySwitchIdentifier::Right)
        } else {
            (SplitKeySwitchIdentifier::Right, SplitKeySwitchIdentifier::Left)
        };

        self.switches
            .iter()
            .copied()
            .map(near)
            .chain(far_side.into_iter().map(far))
            .take(RO)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitKeySwitchIdentifier<const SZ: usize, I: KeySwitchIdentifier<SZ>> {
    Left(I),
    Right(I),
}

impl<const SZ: usize, I: KeySwitchIdentifier<SZ>> SplitKeySwitchIdentifier<SZ, I> {
    pub fn inner(&self) -> I {
        match *self {
            SplitKeySwitchIdentifier::Left(i) | SplitKeySwitchIdentifier::Right(i) => i,
        }
    }

    pub fn is_left(&self) -> bool {
        matches!(self, SplitKeySwitchIdentifier::Left(_))
    }
}

macro_rules! impl_split_key_switches {
    ( $x:expr ) => {
        impl<I: KeySwitchIdentifier<$x>> From<[u8; $x + 1]> for SplitKeySwitchIdentifier<$x, I> {
            /// Tag byte 0 is the left half, anything else the right half.
            fn from(value: [u8; $x + 1]) -> Self {
                let mut inner = [0u8; $x];
                inner.copy_from_slice(&value[1..]);
                if value[0] == 0 {
                    SplitKeySwitchIdentifier::Left(I::from(inner))
                } else {
                    SplitKeySwitchIdentifier::Right(I::from(inner))
                }
            }
        }
        impl<I: KeySwitchIdentifier<$x>> From<SplitKeySwitchIdentifier<$x, I>> for [u8; $x + 1] {
            fn from(value: SplitKeySwitchIdentifier<$x, I>) -> Self {
                let (tag, inner) = match value {
                    SplitKeySwitchIdentifier::Left(v) => (0, v),
                    SplitKeySwitchIdentifier::Right(v) => (1, v),
                };
                let bytes: [u8; $x] = inner.into();
                let mut r = [0u8; $x + 1];
                r[0] = tag;
                r[1..].copy_from_slice(&bytes);
                r
            }
        }
        impl<I: KeySwitchIdentifier<$x>> KeySwitchIdentifier<{ $x + 1 }>
            for SplitKeySwitchIdentifier<$x, I>
        {
        }
        impl<const RO: usize, C: Connection, K: KeySwitches<$x, RO>, T: CountDown<Time = Duration>>
            KeySwitches<{ $x + 1 }, RO> for SplitKeySwitches<$x, RO, C, K, T>
        {
            type Identifier = SplitKeySwitchIdentifier<$x, K::Identifier>;
            fn scan(&mut self) -> Vec<Self::Identifier, RO> {
                self.scan_both()
            }
        }
    };
}

impl_split_key_switches!(1);
impl_split_key_switches!(2);
impl_split_key_switches!(3);
impl_split_key_switches!(4);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::connection::tests::{FakeConnection, FakeTimer, Id};

    struct Half(Vec<Id, 4>);

    impl KeySwitches<2, 4> for Half {
        type Identifier = Id;

        fn scan(&mut self) -> Vec<Id, 4> {
            self.0.clone()
        }
    }

    fn split(is_left: bool) -> SplitKeySwitches<2, 4, FakeConnection, Half, FakeTimer> {
        let half = Half([Id(0, 1)].into_iter().collect());
        SplitKeySwitches::new(
            half,
            FakeConnection::default(),
            FakeTimer::new(50),
            Duration::millis(10),
            is_left,
        )
    }

    #[test]
    fn identifier_bytes_carry_the_side() {
        let left = SplitKeySwitchIdentifier::<2, Id>::Left(Id(3, 4));
        let bytes: [u8; 3] = left.into();
        assert_eq!(bytes, [0, 3, 4]);
        assert_eq!(SplitKeySwitchIdentifier::<2, Id>::from(bytes), left);
        let right = SplitKeySwitchIdentifier::<2, Id>::from([1, 5, 6]);
        assert_eq!(right, SplitKeySwitchIdentifier::Right(Id(5, 6)));
        assert!(!right.is_left());
        assert_eq!(right.inner(), Id(5, 6));
    }

    #[test]
    fn left_half_connects_and_merges() {
        let mut switches = split(true);
        switches
            .communicator
            .connection()
            .rx
            .borrow_mut()
            .extend([0xfe, 0x01, 1, 2, 2]);
        let scanned = switches.scan();
        assert_eq!(switches.state(), SplitState::Controller);
        assert_eq!(
            scanned.as_slice(),
            &[
                SplitKeySwitchIdentifier::Left(Id(0, 1)),
                SplitKeySwitchIdentifier::Right(Id(2, 2)),
            ]
        );
    }

    #[test]
    fn right_half_waits_for_the_left() {
        let mut switches = split(false);
        assert_eq!(
            switches.scan().as_slice(),
            &[SplitKeySwitchIdentifier::Right(Id(0, 1))]
        );
        assert_eq!(switches.state(), SplitState::Undetermined);
        assert!(switches.communicator.connection().tx.borrow().is_empty());
    }
}
