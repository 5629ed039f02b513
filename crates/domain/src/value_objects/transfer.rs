use crate::errors::{DomainError, DomainResult};

literal_enum!(
    /// Direction of a transfer relative to this office
    TransferType, "type" {
        Incoming => "INCOMING",
        Outgoing => "OUTGOING",
    }
);

literal_enum!(
    /// `PENDING -> COMPLETED`
    TransferStatus, "status" {
        Pending => "PENDING",
        Completed => "COMPLETED",
    }
);

impl TransferStatus {
    pub fn transition_to(self, target: TransferStatus) -> DomainResult<TransferStatus> {
        match (self, target) {
            (TransferStatus::Pending, TransferStatus::Completed) => Ok(target),
            _ => Err(DomainError::InvalidTransition {
                entity: "transfer",
                from: self.to_string(),
                to: target.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_is_terminal() {
        assert_eq!(
            TransferStatus::Pending
                .transition_to(TransferStatus::Completed)
                .unwrap(),
            TransferStatus::Completed
        );
        assert!(TransferStatus::Completed
            .transition_to(TransferStatus::Completed)
            .is_err());
        assert!(TransferStatus::Completed
            .transition_to(TransferStatus::Pending)
            .is_err());
    }
}
