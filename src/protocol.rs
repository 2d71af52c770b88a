//! Request/response message surface over the solve facades.
//!
//! The solver is meant to run isolated from its caller (typically on a
//! dedicated worker), so every operation is expressed as a serializable
//! request with a matching response. Requests are stateless with respect to
//! one another; `init` fixes the region and catalogue for the session the
//! later calls are dispatched against. Failures cross this boundary only as
//! the `Error` response variant, never as a panic or a raised error.

/// Messages for the flat backtracking path.
pub mod rect {
    use serde::{Deserialize, Serialize};

    use crate::backtrack::TracedSearch;
    use crate::board::Region;
    use crate::placement::Placement;
    use crate::session::RectSession;
    use crate::trace::TraceEvent;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "op", rename_all = "snake_case")]
    pub enum Request {
        Solve {
            #[serde(default)]
            prefix: Vec<Placement>,
            max_solutions: usize,
        },
        SolveWithTrace {
            #[serde(default)]
            prefix: Vec<Placement>,
            max_solutions: usize,
            max_trace_events: usize,
        },
        Hint {
            #[serde(default)]
            prefix: Vec<Placement>,
        },
        CountSolutions {
            #[serde(default)]
            prefix: Vec<Placement>,
            max_count: usize,
        },
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "status", rename_all = "snake_case")]
    pub enum Response {
        /// Acknowledges `init`. The flat path keeps no placement table, so
        /// readiness only reports the count for information.
        Ready { placements: usize },
        /// Complete solutions, each the resolved prefix followed by the
        /// search's placements. Empty when the prefix cannot be completed —
        /// including when the prefix itself was invalid.
        Solutions { solutions: Vec<Vec<Placement>> },
        Traced {
            solutions: Vec<Vec<Placement>>,
            prefix: Vec<Placement>,
            trace: Vec<TraceEvent>,
        },
        Hint { placement: Option<Placement> },
        Count { count: usize, complete: bool },
        /// The trace cap was exceeded; retry in a cheaper mode.
        NoResult,
    }

    /// Fixes the region for a new session and acknowledges readiness.
    pub fn init(region: Region) -> (RectSession, Response) {
        let session = RectSession::new(region);
        let placements = session.placement_count();
        (session, Response::Ready { placements })
    }

    pub fn handle(session: &RectSession, request: &Request) -> Response {
        match request {
            Request::Solve {
                prefix,
                max_solutions,
            } => Response::Solutions {
                solutions: session.solve(prefix, *max_solutions),
            },
            Request::SolveWithTrace {
                prefix,
                max_solutions,
                max_trace_events,
            } => match session.solve_with_trace(prefix, *max_solutions, *max_trace_events) {
                TracedSearch::Done { solutions, trace } => Response::Traced {
                    solutions,
                    prefix: prefix.clone(),
                    trace,
                },
                TracedSearch::Overflow => Response::NoResult,
            },
            Request::Hint { prefix } => Response::Hint {
                placement: session.hint(prefix),
            },
            Request::CountSolutions { prefix, max_count } => {
                let counted = session.count_solutions(prefix, *max_count);
                Response::Count {
                    count: counted.count,
                    complete: counted.complete,
                }
            }
        }
    }
}

/// Messages for the box exact-cover path. Prefixes are placement ids,
/// opaque integers stable within one `init` lifetime.
pub mod cover {
    use serde::{Deserialize, Serialize};

    use crate::cover::{BoxPlacement, BoxRegion};
    use crate::error::Error;
    use crate::session::{BoxSession, TracedBoxSearch};
    use crate::trace::BoxTraceEvent;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "op", rename_all = "snake_case")]
    pub enum Request {
        Solve {
            #[serde(default)]
            prefix: Vec<usize>,
            max_solutions: usize,
        },
        SolveWithTrace {
            #[serde(default)]
            prefix: Vec<usize>,
            max_solutions: usize,
            max_trace_events: usize,
        },
        Hint {
            #[serde(default)]
            prefix: Vec<usize>,
        },
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "status", rename_all = "snake_case")]
    pub enum Response {
        /// Acknowledges `init` with the number of legal placements, which
        /// is also the valid id range.
        Ready { placements: usize },
        Solutions {
            solutions: Vec<Vec<usize>>,
            /// The first solution resolved to concrete placements.
            first: Option<Vec<BoxPlacement>>,
        },
        Traced {
            solutions: Vec<Vec<usize>>,
            first: Option<Vec<BoxPlacement>>,
            prefix: Vec<BoxPlacement>,
            trace: Vec<BoxTraceEvent>,
        },
        Hint { placement: Option<BoxPlacement> },
        /// The trace cap was exceeded; retry in a cheaper mode.
        NoResult,
        Error { message: String },
    }

    /// Builds the exact-cover model for a new session and acknowledges it.
    pub fn init(region: BoxRegion) -> (BoxSession, Response) {
        let session = BoxSession::new(region);
        let placements = session.placement_count();
        (session, Response::Ready { placements })
    }

    pub fn handle(session: &BoxSession, request: &Request) -> Response {
        match try_handle(session, request) {
            Ok(response) => response,
            Err(error) => Response::Error {
                message: error.to_string(),
            },
        }
    }

    fn try_handle(session: &BoxSession, request: &Request) -> Result<Response, Error> {
        match request {
            Request::Solve {
                prefix,
                max_solutions,
            } => {
                let solutions = session.solve(prefix, *max_solutions)?;
                let first = match solutions.first() {
                    Some(ids) => Some(session.resolve(ids)?),
                    None => None,
                };
                Ok(Response::Solutions { solutions, first })
            }
            Request::SolveWithTrace {
                prefix,
                max_solutions,
                max_trace_events,
            } => match session.solve_with_trace(prefix, *max_solutions, *max_trace_events)? {
                TracedBoxSearch::Done { solutions, trace } => {
                    let first = match solutions.first() {
                        Some(ids) => Some(session.resolve(ids)?),
                        None => None,
                    };
                    let prefix = session.resolve(prefix)?;
                    Ok(Response::Traced {
                        solutions,
                        first,
                        prefix,
                        trace,
                    })
                }
                TracedBoxSearch::Overflow => Ok(Response::NoResult),
            },
            Request::Hint { prefix } => Ok(Response::Hint {
                placement: session.hint(prefix)?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Region;
    use crate::cover::BoxRegion;
    use crate::shapes::ShapeId;

    #[test]
    fn rect_requests_serialize_to_tagged_json() {
        let request = rect::Request::CountSolutions {
            prefix: Vec::new(),
            max_count: 50,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"op": "count_solutions", "prefix": [], "max_count": 50})
        );

        let parsed: rect::Request =
            serde_json::from_str(r#"{"op": "hint", "prefix": [{"shape": "X", "cells": [[0,1],[1,0],[1,1],[1,2],[2,1]]}]}"#)
                .unwrap();
        let rect::Request::Hint { prefix } = parsed else {
            panic!("wrong op parsed");
        };
        assert_eq!(prefix.len(), 1);
        assert_eq!(prefix[0].shape, ShapeId::X);
    }

    #[test]
    fn prefix_defaults_to_empty() {
        let parsed: cover::Request =
            serde_json::from_str(r#"{"op": "solve", "max_solutions": 2}"#).unwrap();
        assert_eq!(
            parsed,
            cover::Request::Solve {
                prefix: Vec::new(),
                max_solutions: 2
            }
        );
    }

    #[test]
    fn rect_solve_round_trip() {
        let (session, ready) = rect::init(Region::mask(3, 3, *ShapeId::X.base_cells()));
        assert_eq!(ready, rect::Response::Ready { placements: 1 });

        let response = rect::handle(
            &session,
            &rect::Request::Solve {
                prefix: Vec::new(),
                max_solutions: 5,
            },
        );
        let rect::Response::Solutions { solutions } = response else {
            panic!("expected solutions");
        };
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0][0].shape, ShapeId::X);
    }

    #[test]
    fn rect_trace_overflow_is_a_no_result() {
        let (session, _) = rect::init(Region::rectangle(6, 10));
        let response = rect::handle(
            &session,
            &rect::Request::SolveWithTrace {
                prefix: Vec::new(),
                max_solutions: 1,
                max_trace_events: 1,
            },
        );
        assert_eq!(response, rect::Response::NoResult);
    }

    #[test]
    fn cover_solve_resolves_the_first_solution() {
        let (session, ready) = cover::init(BoxRegion::new(3, 4, 5));
        let cover::Response::Ready { placements } = ready else {
            panic!("expected readiness");
        };
        assert!(placements > 0);

        let response = cover::handle(
            &session,
            &cover::Request::Solve {
                prefix: Vec::new(),
                max_solutions: 1,
            },
        );
        let cover::Response::Solutions { solutions, first } = response else {
            panic!("expected solutions");
        };
        assert_eq!(solutions.len(), 1);
        assert_eq!(first.unwrap().len(), 12);
    }

    #[test]
    fn cover_unknown_id_becomes_an_error_response() {
        let (session, _) = cover::init(BoxRegion::new(3, 4, 5));
        let bogus = session.placement_count() + 1;
        let response = cover::handle(
            &session,
            &cover::Request::Hint {
                prefix: vec![bogus],
            },
        );
        let cover::Response::Error { message } = response else {
            panic!("expected an error response");
        };
        assert!(message.contains("placement id"));
    }
}
