use crate::{Alg, Unit};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpansionDirection {
    Forward,
    Backward,
}

impl ExpansionDirection {
    #[must_use]
    pub fn reversed(self) -> ExpansionDirection {
        match self {
            ExpansionDirection::Forward => ExpansionDirection::Backward,
            ExpansionDirection::Backward => ExpansionDirection::Forward,
        }
    }

    fn toggled_if(self, toggle: bool) -> ExpansionDirection {
        if toggle { self.reversed() } else { self }
    }
}

/// One level of the walk: either the units of an alg being read in some
/// direction, or the algs a container repeats
#[derive(Clone, Debug)]
enum Frame {
    Units {
        alg: Alg,
        index: usize,
        direction: ExpansionDirection,
        depth: Option<usize>,
    },
    Repeat {
        steps: Vec<(Alg, ExpansionDirection)>,
        next_step: usize,
        remaining: u32,
        depth: Option<usize>,
    },
}

enum Step {
    Skip,
    Pop,
    Push(Frame),
    Yield(Unit),
}

/// The leaves of an expanded alg, produced one at a time. Cloning an
/// expansion restarts it from the clone's current position.
#[derive(Clone, Debug)]
pub struct Expansion {
    stack: Vec<Frame>,
}

fn oriented(unit: &Unit, direction: ExpansionDirection) -> Unit {
    match direction {
        ExpansionDirection::Forward => unit.clone(),
        ExpansionDirection::Backward => unit.invert(),
    }
}

/// The algs a container walks through once per repetition, and how often
fn repetition(
    unit: &Unit,
    direction: ExpansionDirection,
) -> Option<(Vec<(Alg, ExpansionDirection)>, i32)> {
    use ExpansionDirection::{Backward, Forward};

    Some(match unit {
        Unit::Grouping(grouping) => (
            vec![(
                grouping.alg().clone(),
                direction.toggled_if(grouping.amount() < 0),
            )],
            grouping.amount(),
        ),
        Unit::Commutator(commutator) => {
            let (first, second) = match direction.toggled_if(commutator.amount() < 0) {
                Forward => (commutator.a(), commutator.b()),
                Backward => (commutator.b(), commutator.a()),
            };
            (
                vec![
                    (first.clone(), Forward),
                    (second.clone(), Forward),
                    (first.clone(), Backward),
                    (second.clone(), Backward),
                ],
                commutator.amount(),
            )
        }
        Unit::Conjugate(conjugate) => (
            vec![
                (conjugate.a().clone(), Forward),
                (
                    conjugate.b().clone(),
                    direction.toggled_if(conjugate.amount() < 0),
                ),
                (conjugate.a().clone(), Backward),
            ],
            conjugate.amount(),
        ),
        Unit::Move(_) | Unit::Newline | Unit::LineComment(_) | Unit::Pause => return None,
    })
}

impl Frame {
    fn step(&mut self) -> Step {
        match self {
            Frame::Units {
                alg,
                index,
                direction,
                depth,
            } => {
                let units = alg.units();
                if *index == units.len() {
                    return Step::Pop;
                }
                let unit = match direction {
                    ExpansionDirection::Forward => &units[*index],
                    ExpansionDirection::Backward => &units[units.len() - 1 - *index],
                };
                *index += 1;

                if *depth == Some(0) {
                    return Step::Yield(oriented(unit, *direction));
                }
                match repetition(unit, *direction) {
                    None => Step::Yield(oriented(unit, *direction)),
                    Some((_, 0)) => Step::Skip,
                    Some((steps, amount)) => Step::Push(Frame::Repeat {
                        steps,
                        next_step: 0,
                        remaining: amount.unsigned_abs(),
                        depth: depth.map(|depth| depth - 1),
                    }),
                }
            }
            Frame::Repeat {
                steps,
                next_step,
                remaining,
                depth,
            } => {
                if *next_step == steps.len() {
                    *remaining = remaining.saturating_sub(1);
                    *next_step = 0;
                }
                if *remaining == 0 {
                    return Step::Pop;
                }
                let (alg, direction) = steps[*next_step].clone();
                *next_step += 1;
                Step::Push(Frame::Units {
                    alg,
                    index: 0,
                    direction,
                    depth: *depth,
                })
            }
        }
    }
}

impl Iterator for Expansion {
    type Item = Unit;

    fn next(&mut self) -> Option<Unit> {
        loop {
            match self.stack.last_mut()?.step() {
                Step::Skip => {}
                Step::Pop => {
                    self.stack.pop();
                }
                Step::Push(frame) => self.stack.push(frame),
                Step::Yield(unit) => return Some(unit),
            }
        }
    }
}

pub(crate) fn expand_alg(
    alg: &Alg,
    direction: ExpansionDirection,
    depth: Option<usize>,
) -> Expansion {
    Expansion {
        stack: vec![Frame::Units {
            alg: alg.clone(),
            index: 0,
            direction,
            depth,
        }],
    }
}
