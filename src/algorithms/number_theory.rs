//! Number theory: Euclid's gcd, the sieve of Eratosthenes, fast modular
//! exponentiation

use crate::recorder::errors::{check_range, InputError};
use crate::snapshot::{Payload, Recorder, Role, Snapshot, Status, StepBudgetExceeded};

pub const MAX_OPERAND: u64 = 1_000_000_000_000;
pub const MAX_SIEVE: usize = 400;

pub const GCD_CODE: &[&str] = &[
    "gcd(a, b):",
    "  while b != 0:",
    "    r = a mod b",
    "    a, b = b, r",
    "  return a",
];

pub const SIEVE_CODE: &[&str] = &[
    "mark 2..=n as candidate primes",
    "for p = 2 while p * p <= n:",
    "  if p is still marked prime:",
    "    for m in p*p..=n step p:",
    "      cross out m",
    "every number still marked is prime",
];

pub const MOD_POW_CODE: &[&str] = &[
    "result = 1; b = base mod m",
    "while e > 0:",
    "  if e is odd: result = result * b mod m",
    "  b = b * b mod m",
    "  e = e >> 1",
    "return result",
];

fn operand(what: &'static str, value: u64) -> Result<(), InputError> {
    if value > MAX_OPERAND {
        return Err(InputError::OutOfRange {
            what,
            value: i64::try_from(value).unwrap_or(i64::MAX),
            min: 0,
            max: MAX_OPERAND as i64,
        });
    }
    Ok(())
}

pub fn validate_gcd(a: u64, b: u64) -> Result<(), InputError> {
    operand("a", a)?;
    operand("b", b)?;
    if a == 0 && b == 0 {
        return Err(InputError::BothZero);
    }
    Ok(())
}

/// Append-only ledger of rows, one per loop iteration
struct Ledger {
    columns: Vec<String>,
    rows: Vec<Vec<Option<i64>>>,
}

impl Ledger {
    fn new(columns: &[&str]) -> Self {
        Ledger {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: &[Option<u64>]) {
        self.rows.push(
            row.iter()
                .map(|cell| cell.map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
                .collect(),
        );
    }

    /// Highlight position of a cell in the most recent row
    fn latest(&self, col: usize) -> usize {
        self.rows.len().saturating_sub(1) * self.columns.len() + col
    }

    fn payload(&self) -> Payload {
        Payload::Table {
            row_labels: (1..=self.rows.len()).map(|i| format!("step {}", i)).collect(),
            col_labels: self.columns.clone(),
            cells: self.rows.clone(),
        }
    }
}

pub fn gcd(a: u64, b: u64, rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut ledger = Ledger::new(&["a", "b", "a mod b"]);
    let (mut x, mut y) = (a, b);
    ledger.push(&[Some(x), Some(y), None]);
    rec.push(
        Snapshot::new(ledger.payload(), format!("gcd({}, {})", a, b))
            .line(0)
            .var("a", x)
            .var("b", y),
    )?;

    while y != 0 {
        let r = x % y;
        if let Some(row) = ledger.rows.last_mut() {
            row[2] = Some(i64::try_from(r).unwrap_or(i64::MAX));
        }
        rec.push(
            Snapshot::new(ledger.payload(), format!("{} mod {} = {}", x, y, r))
                .highlight(Role::Comparing, [ledger.latest(0), ledger.latest(1)])
                .highlight(Role::Active, [ledger.latest(2)])
                .line(2)
                .var("a", x)
                .var("b", y)
                .var("r", r),
        )?;
        x = y;
        y = r;
        ledger.push(&[Some(x), Some(y), None]);
        rec.push(
            Snapshot::new(ledger.payload(), format!("Shift: a = {}, b = {}", x, y))
                .highlight(Role::Swapped, [ledger.latest(0), ledger.latest(1)])
                .line(3)
                .var("a", x)
                .var("b", y),
        )?;
    }

    rec.push(
        Snapshot::new(ledger.payload(), format!("b is 0, so gcd({}, {}) = {}", a, b, x))
            .highlight(Role::Found, [ledger.latest(0)])
            .line(4)
            .var("a", x)
            .var("b", y)
            .var("result", x)
            .status(Status::Done),
    )
}

pub fn validate_sieve(limit: usize) -> Result<(), InputError> {
    check_range("sieve bound", limit as i64, 2, MAX_SIEVE as i64)
}

pub fn sieve(limit: usize, rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let numbers: Vec<i64> = (0..=limit as i64).collect();
    let mut prime = vec![true; limit + 1];
    prime[0] = false;
    prime[1] = false;

    let frame = |prime: &[bool], narration: String| {
        Snapshot::new(super::array(&numbers), narration)
            .highlight(Role::Prime, (2..=limit).filter(|&k| prime[k]))
            .highlight(Role::Composite, (2..=limit).filter(|&k| !prime[k]))
            .highlight(Role::Eliminated, [0, 1])
    };

    rec.push(
        frame(&prime, format!("Every number from 2 to {} starts as a candidate", limit))
            .line(0)
            .var("n", limit),
    )?;

    let mut p = 2;
    while p * p <= limit {
        if !prime[p] {
            rec.push(
                frame(&prime, format!("{} was already crossed out, skip it", p))
                    .highlight(Role::Comparing, [p])
                    .line(2)
                    .var("p", p),
            )?;
            p += 1;
            continue;
        }
        rec.push(
            frame(&prime, format!("{} is prime: cross out its multiples from {}", p, p * p))
                .highlight(Role::Active, [p])
                .line(2)
                .var("p", p),
        )?;
        for m in (p * p..=limit).step_by(p) {
            let fresh = prime[m];
            prime[m] = false;
            rec.push(
                frame(
                    &prime,
                    if fresh {
                        format!("Cross out {} = {} x {}", m, p, m / p)
                    } else {
                        format!("{} is already crossed out", m)
                    },
                )
                .highlight(Role::Active, [p])
                .highlight(Role::Comparing, [m])
                .line(4)
                .var("p", p)
                .var("m", m),
            )?;
        }
        p += 1;
    }

    let primes: Vec<usize> = (2..=limit).filter(|&k| prime[k]).collect();
    rec.push(
        frame(
            &prime,
            format!("{} primes up to {}", primes.len(), limit),
        )
        .highlight(Role::Found, primes.iter().copied())
        .line(5)
        .var("count", primes.len())
        .status(Status::Done),
    )
}

pub fn validate_mod_pow(exponent: u64, modulus: u64) -> Result<(), InputError> {
    operand("modulus", modulus)?;
    if modulus == 0 {
        return Err(InputError::OutOfRange {
            what: "modulus",
            value: 0,
            min: 1,
            max: MAX_OPERAND as i64,
        });
    }
    operand("exponent", exponent)
}

pub fn mod_pow(
    base: u64,
    exponent: u64,
    modulus: u64,
    rec: &mut Recorder,
) -> Result<(), StepBudgetExceeded> {
    let m = u128::from(modulus);
    let mut b = u128::from(base) % m;
    let mut e = exponent;
    let mut result = 1 % m;
    // cells are reduced mod m, which is bounded by MAX_OPERAND
    let narrow = |v: u128| Some(v as u64);

    let mut ledger = Ledger::new(&["e", "bit", "b", "result"]);
    ledger.push(&[Some(e), None, narrow(b), narrow(result)]);
    rec.push(
        Snapshot::new(
            ledger.payload(),
            format!("{}^{} mod {}: start with result = 1, b = {}", base, exponent, modulus, b),
        )
        .line(0)
        .var("e", e)
        .var("b", b as u64)
        .var("result", result as u64),
    )?;

    while e > 0 {
        let bit = e & 1;
        if let Some(row) = ledger.rows.last_mut() {
            row[1] = Some(bit as i64);
        }
        if bit == 1 {
            let before = result;
            result = result * b % m;
            if let Some(row) = ledger.rows.last_mut() {
                row[3] = Some(result as i64);
            }
            rec.push(
                Snapshot::new(
                    ledger.payload(),
                    format!(
                        "Low bit is 1: result = {} * {} mod {} = {}",
                        before, b, modulus, result
                    ),
                )
                .highlight(Role::Active, [ledger.latest(3)])
                .highlight(Role::Comparing, [ledger.latest(1)])
                .line(2)
                .var("e", e)
                .var("b", b as u64)
                .var("result", result as u64),
            )?;
        } else {
            rec.push(
                Snapshot::new(ledger.payload(), "Low bit is 0: result is unchanged")
                    .highlight(Role::Comparing, [ledger.latest(1)])
                    .line(2)
                    .var("e", e)
                    .var("b", b as u64)
                    .var("result", result as u64),
            )?;
        }
        b = b * b % m;
        e >>= 1;
        ledger.push(&[Some(e), None, narrow(b), narrow(result)]);
        rec.push(
            Snapshot::new(ledger.payload(), format!("Square b to {} and shift e to {}", b, e))
                .highlight(Role::Swapped, [ledger.latest(0), ledger.latest(2)])
                .line(4)
                .var("e", e)
                .var("b", b as u64)
                .var("result", result as u64),
        )?;
    }

    rec.push(
        Snapshot::new(
            ledger.payload(),
            format!("{}^{} mod {} = {}", base, exponent, modulus, result),
        )
        .highlight(Role::Found, [ledger.latest(3)])
        .line(5)
        .var("result", result as u64)
        .status(Status::Done),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::VarValue;

    #[test]
    fn mod_pow_matches_repeated_multiplication() {
        let mut rec = Recorder::new(1_000);
        mod_pow(7, 13, 11, &mut rec).unwrap();
        let expected = (0..13).fold(1u64, |acc, _| acc * 7 % 11);
        assert_eq!(
            rec.last().unwrap().variable("result"),
            Some(&VarValue::Int(expected as i64))
        );
    }

    #[test]
    fn sieve_keeps_exactly_the_primes() {
        let mut rec = Recorder::new(10_000);
        sieve(30, &mut rec).unwrap();
        assert_eq!(
            rec.last().unwrap().marked(Role::Prime),
            &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29]
        );
    }
}
