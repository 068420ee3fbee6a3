//! PowerPC instruction decoder.

use crate::bits::ppc::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PpcInst {
    Halt,

    Add, Subf, Addi, Addis, Cmp,
    PsAdd, PsSub, PsMul,
    B, Bc,
    Lwz, Stw,
    Sc, Rfi,
    Sync, Isync, Eieio,

    Unimpl,
}

impl PpcInst {
    /// Decode an instruction word.
    pub fn decode(word: u32) -> Self {
        use PpcInst::*;
        if word == 0 {
            return Halt;
        }
        match word >> 26 {
            4 => match AFormBits(word).xo() {
                20 => PsSub,
                21 => PsAdd,
                25 => PsMul,
                _ => Unimpl,
            },
            14 => Addi,
            15 => Addis,
            16 => Bc,
            17 => Sc,
            18 => B,
            19 => match XFormBits(word).xo() {
                50 => Rfi,
                150 => Isync,
                _ => Unimpl,
            },
            31 => match XFormBits(word).xo() {
                0 => Cmp,
                40 => Subf,
                266 => Add,
                598 => Sync,
                854 => Eieio,
                _ => Unimpl,
            },
            32 => Lwz,
            36 => Stw,
            _ => Unimpl,
        }
    }
}

impl std::fmt::Display for PpcInst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !f.alternate() {
            return core::fmt::Debug::fmt(&self, f);
        }
        match self {
            PpcInst::Halt   => write!(f, "halt"),
            PpcInst::Add    => write!(f, "add"),
            PpcInst::Subf   => write!(f, "subf"),
            PpcInst::Addi   => write!(f, "addi"),
            PpcInst::Addis  => write!(f, "addis"),
            PpcInst::Cmp    => write!(f, "cmp"),
            PpcInst::PsAdd  => write!(f, "ps_add"),
            PpcInst::PsSub  => write!(f, "ps_sub"),
            PpcInst::PsMul  => write!(f, "ps_mul"),
            PpcInst::B      => write!(f, "b"),
            PpcInst::Bc     => write!(f, "bc"),
            PpcInst::Lwz    => write!(f, "lwz"),
            PpcInst::Stw    => write!(f, "stw"),
            PpcInst::Sc     => write!(f, "sc"),
            PpcInst::Rfi    => write!(f, "rfi"),
            PpcInst::Sync   => write!(f, "sync"),
            PpcInst::Isync  => write!(f, "isync"),
            PpcInst::Eieio  => write!(f, "eieio"),
            PpcInst::Unimpl => write!(f, ".long"),
        }
    }
}

/// Render an instruction word as assembly, for trace output.
///
/// Branch targets are printed relative to `pc`.
pub fn disassemble(word: u32, pc: u32) -> String {
    use PpcInst::*;
    let inst = PpcInst::decode(word);
    match inst {
        Add | Subf => {
            let op = XFormBits(word);
            format!("{inst:#} r{}, r{}, r{}", op.rd(), op.ra(), op.rb())
        },
        Cmp => {
            let op = XFormBits(word);
            format!("{inst:#} cr{}, r{}, r{}", op.crfd(), op.ra(), op.rb())
        },
        Addi | Addis => {
            let op = DFormBits(word);
            format!("{inst:#} r{}, r{}, {}", op.rd(), op.ra(), op.simm())
        },
        Lwz | Stw => {
            let op = DFormBits(word);
            format!("{inst:#} r{}, {}(r{})", op.rd(), op.simm(), op.ra())
        },
        PsAdd | PsSub => {
            let op = AFormBits(word);
            format!("{inst:#} f{}, f{}, f{}", op.frd(), op.fra(), op.frb())
        },
        PsMul => {
            let op = AFormBits(word);
            format!("{inst:#} f{}, f{}, f{}", op.frd(), op.fra(), op.frc())
        },
        B => {
            let op = IFormBits(word);
            let target = if op.aa() { op.li() as u32 } else { pc.wrapping_add(op.li() as u32) };
            let suffix = match (op.lk(), op.aa()) {
                (false, false) => "",
                (true, false) => "l",
                (false, true) => "a",
                (true, true) => "la",
            };
            format!("{inst:#}{suffix} {target:08x}")
        },
        Bc => {
            let op = BFormBits(word);
            let target = if op.aa() { op.bd() as u32 } else { pc.wrapping_add(op.bd() as u32) };
            let suffix = if op.lk() { "l" } else { "" };
            format!("{inst:#}{suffix} {}, {}, {target:08x}", op.bo(), op.bi())
        },
        Unimpl => format!("{inst:#} {word:08x}"),
        Halt | Sc | Rfi | Sync | Isync | Eieio => format!("{inst:#}"),
    }
}
