//! Programmable transaction drafts.
//!
//! A [`TransactionDraft`] accumulates inputs and commands for one operation. It is not
//! shared: each action builds its own and hands it to the dispatcher.

use crate::type_tag::TypeTag;
use crate::types::{ObjectId, ObjectRef, SuiAddress};
use eyre::Context as _;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CallArg {
    Pure(Vec<u8>),
    Object(ObjectArg),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject {
        id: ObjectId,
        initial_shared_version: u64,
        mutable: bool,
    },
}

impl ObjectArg {
    const fn id(&self) -> ObjectId {
        match self {
            Self::ImmOrOwnedObject(r) => r.object_id,
            Self::SharedObject { id, .. } => *id,
        }
    }
}

/// Handle to a value inside the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Argument {
    /// The coin used to pay for gas; spendable like any other coin.
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

impl Argument {
    /// The `i`-th value of a multi-value command result.
    pub const fn nested(self, i: u16) -> Option<Self> {
        match self {
            Self::Result(c) => Some(Self::NestedResult(c, i)),
            Self::GasCoin | Self::Input(_) | Self::NestedResult(..) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgrammableMoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    TransferObjects(Vec<Argument>, Argument),
    SplitCoins(Argument, Vec<Argument>),
    MergeCoins(Argument, Vec<Argument>),
    /// Never built by a draft; keeps the variants after it on their wire tags.
    Publish(Vec<Vec<u8>>, Vec<ObjectId>),
    MakeMoveVec(Option<TypeTag>, Vec<Argument>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
    sender: Option<SuiAddress>,
    gas_coin_spend: u64,
}

impl TransactionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sender(&mut self, sender: SuiAddress) {
        self.sender = Some(sender);
    }

    pub const fn sender(&self) -> Option<SuiAddress> {
        self.sender
    }

    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Base units split off the gas coin so far. Gas payment must cover this on top of the budget.
    pub const fn gas_coin_spend(&self) -> u64 {
        self.gas_coin_spend
    }

    /// Ids of every object the draft consumes; these cannot double as gas payment.
    pub fn input_object_ids(&self) -> Vec<ObjectId> {
        self.inputs
            .iter()
            .filter_map(|i| match i {
                CallArg::Object(o) => Some(o.id()),
                CallArg::Pure(_) => None,
            })
            .collect()
    }

    fn push_input(&mut self, arg: CallArg) -> eyre::Result<Argument> {
        let idx = u16::try_from(self.inputs.len()).context("too many transaction inputs")?;
        self.inputs.push(arg);
        Ok(Argument::Input(idx))
    }

    fn push_command(&mut self, cmd: Command) -> eyre::Result<Argument> {
        let idx = u16::try_from(self.commands.len()).context("too many transaction commands")?;
        self.commands.push(cmd);
        Ok(Argument::Result(idx))
    }

    fn find_object(&self, id: ObjectId) -> Option<usize> {
        self.inputs.iter().position(|i| match i {
            CallArg::Object(o) => o.id() == id,
            CallArg::Pure(_) => false,
        })
    }

    /// Owned object input. Adding the same object twice yields the same handle.
    pub fn object(&mut self, r: ObjectRef) -> eyre::Result<Argument> {
        if let Some(pos) = self.find_object(r.object_id) {
            let idx = u16::try_from(pos).context("input index")?;
            return Ok(Argument::Input(idx));
        }
        self.push_input(CallArg::Object(ObjectArg::ImmOrOwnedObject(r)))
    }

    /// Shared object input. A later mutable use upgrades an earlier immutable one.
    pub fn shared_object(
        &mut self,
        id: ObjectId,
        initial_shared_version: u64,
        mutable: bool,
    ) -> eyre::Result<Argument> {
        if let Some(pos) = self.find_object(id) {
            if let Some(CallArg::Object(ObjectArg::SharedObject { mutable: m, .. })) =
                self.inputs.get_mut(pos)
            {
                *m = *m || mutable;
            }
            let idx = u16::try_from(pos).context("input index")?;
            return Ok(Argument::Input(idx));
        }
        self.push_input(CallArg::Object(ObjectArg::SharedObject {
            id,
            initial_shared_version,
            mutable,
        }))
    }

    pub fn pure<T: Serialize>(&mut self, value: &T) -> eyre::Result<Argument> {
        let bytes = bcs::to_bytes(value).context("serialize pure input")?;
        self.push_input(CallArg::Pure(bytes))
    }

    pub fn pure_u64(&mut self, v: u64) -> eyre::Result<Argument> {
        self.pure(&v)
    }

    pub fn pure_address(&mut self, a: SuiAddress) -> eyre::Result<Argument> {
        self.pure(&a)
    }

    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> eyre::Result<Argument> {
        self.push_command(Command::SplitCoins(coin, amounts))
    }

    /// Split a single exact amount off `coin` and return the new coin.
    pub fn split_coin(&mut self, coin: Argument, amount: u64) -> eyre::Result<Argument> {
        let amt = self.pure_u64(amount)?;
        let res = self.split_coins(coin, vec![amt])?;
        if coin == Argument::GasCoin {
            self.gas_coin_spend = self.gas_coin_spend.saturating_add(amount);
        }
        res.nested(0)
            .ok_or_else(|| eyre::eyre!("split did not produce a command result"))
    }

    pub fn merge_coins(&mut self, into: Argument, sources: Vec<Argument>) -> eyre::Result<()> {
        self.push_command(Command::MergeCoins(into, sources))?;
        Ok(())
    }

    pub fn transfer_objects(
        &mut self,
        objects: Vec<Argument>,
        recipient: Argument,
    ) -> eyre::Result<()> {
        self.push_command(Command::TransferObjects(objects, recipient))?;
        Ok(())
    }

    pub fn transfer_to(&mut self, objects: Vec<Argument>, recipient: SuiAddress) -> eyre::Result<()> {
        let to = self.pure_address(recipient)?;
        self.transfer_objects(objects, to)
    }

    /// `vector<T>` from `elements`. The element type may only be omitted when the list is
    /// non-empty.
    pub fn make_move_vec(
        &mut self,
        element_type: Option<TypeTag>,
        elements: Vec<Argument>,
    ) -> eyre::Result<Argument> {
        if element_type.is_none() && elements.is_empty() {
            eyre::bail!("empty move vector needs an element type");
        }
        self.push_command(Command::MakeMoveVec(element_type, elements))
    }

    pub fn move_call(
        &mut self,
        package: ObjectId,
        module: &str,
        function: &str,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> eyre::Result<Argument> {
        self.push_command(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module: module.to_owned(),
            function: function.to_owned(),
            type_arguments,
            arguments,
        })))
    }

    pub fn into_programmable(self) -> ProgrammableTransaction {
        ProgrammableTransaction {
            inputs: self.inputs,
            commands: self.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectDigest;

    fn oref(n: u8) -> ObjectRef {
        ObjectRef {
            object_id: SuiAddress::new([n; 32]),
            version: u64::from(n),
            digest: ObjectDigest::new([n; 32]),
        }
    }

    #[test]
    fn object_inputs_are_deduplicated() -> eyre::Result<()> {
        let mut d = TransactionDraft::new();
        let a = d.object(oref(1))?;
        let b = d.object(oref(2))?;
        let a2 = d.object(oref(1))?;
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(d.inputs().len(), 2);
        assert_eq!(d.input_object_ids().len(), 2);
        Ok(())
    }

    #[test]
    fn shared_objects_upgrade_to_mutable() -> eyre::Result<()> {
        let mut d = TransactionDraft::new();
        let id = SuiAddress::new([9; 32]);
        let a = d.shared_object(id, 1, false)?;
        let b = d.shared_object(id, 1, true)?;
        assert_eq!(a, b);
        assert_eq!(
            d.inputs(),
            &[CallArg::Object(ObjectArg::SharedObject {
                id,
                initial_shared_version: 1,
                mutable: true
            })]
        );
        Ok(())
    }

    #[test]
    fn gas_coin_splits_are_tracked() -> eyre::Result<()> {
        let mut d = TransactionDraft::new();
        let c = d.object(oref(3))?;
        let first = d.split_coin(Argument::GasCoin, 500)?;
        d.split_coin(c, 7)?;
        d.split_coin(Argument::GasCoin, 25)?;
        assert_eq!(first, Argument::NestedResult(0, 0));
        assert_eq!(d.gas_coin_spend(), 525);
        assert_eq!(d.commands().len(), 3);
        Ok(())
    }

    #[test]
    fn command_wire_tags() -> eyre::Result<()> {
        let merge = Command::MergeCoins(Argument::Input(0), vec![Argument::Input(1)]);
        assert_eq!(bcs::to_bytes(&merge)?, vec![3, 1, 0, 0, 1, 1, 1, 0]);
        let split = Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(2)]);
        assert_eq!(bcs::to_bytes(&split)?, vec![2, 0, 1, 1, 2, 0]);
        let vec_cmd = Command::MakeMoveVec(None, vec![Argument::Input(0), Argument::Result(1)]);
        assert_eq!(bcs::to_bytes(&vec_cmd)?, vec![5, 0, 2, 1, 0, 0, 2, 1, 0]);
        let typed = Command::MakeMoveVec(Some(TypeTag::U64), vec![]);
        assert_eq!(bcs::to_bytes(&typed)?, vec![5, 1, 2, 0]);
        Ok(())
    }

    #[test]
    fn nested_only_applies_to_command_results() {
        assert_eq!(Argument::Result(4).nested(1), Some(Argument::NestedResult(4, 1)));
        assert_eq!(Argument::GasCoin.nested(0), None);
        assert_eq!(Argument::Input(2).nested(0), None);
        assert_eq!(Argument::NestedResult(1, 0).nested(0), None);
    }

    #[test]
    fn move_vectors_collect_coins() -> eyre::Result<()> {
        let mut d = TransactionDraft::new();
        let a = d.object(oref(1))?;
        let b = d.object(oref(2))?;
        let v = d.make_move_vec(None, vec![a, b])?;
        assert_eq!(v, Argument::Result(0));
        assert_eq!(
            d.commands().first(),
            Some(&Command::MakeMoveVec(None, vec![a, b]))
        );
        assert!(
            d.make_move_vec(None, vec![]).is_err(),
            "untyped empty vector is rejected"
        );
        assert!(d.make_move_vec(Some(TypeTag::U64), vec![]).is_ok(), "typed empty vector");
        Ok(())
    }
}
