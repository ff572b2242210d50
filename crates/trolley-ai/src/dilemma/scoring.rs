use super::domain::{Person, Roster};
use super::weights::WeightTable;

/// Ethical value of a single person: age weight + role weight + the weights of each flag.
pub fn person_value(person: &Person, table: &WeightTable) -> i64 {
    person.flags().fold(
        table
            .age
            .weight(person.age())
            .saturating_add(table.role.weight(person.role())),
        |value, flag| value.saturating_add(table.flag.weight(flag)),
    )
}

/// Summed value of everyone on the track. An empty track loses nothing.
pub fn track_loss(track: &Roster, table: &WeightTable) -> i64 {
    track
        .people()
        .iter()
        .fold(0, |loss: i64, person| {
            loss.saturating_add(person_value(person, table))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dilemma::domain::{AgeGroup, Flag, Role};
    use crate::dilemma::weights::WeightOverrides;

    #[test]
    fn blank_person_is_worth_two_under_any_table() {
        let blank = Person::default();
        let mut skewed = WeightTable::default();
        skewed.age.adult = 40;
        skewed.role.other = -7;

        assert_eq!(person_value(&blank, &WeightTable::default()), 2);
        assert_eq!(person_value(&blank, &skewed), 2);
    }

    #[test]
    fn value_sums_age_role_and_flags() {
        let person = Person::new(
            Some(AgeGroup::Child),
            Some(Role::Doctor),
            [Flag::Innocent, Flag::Disabled],
        );
        assert_eq!(person_value(&person, &WeightTable::default()), 4 + 4 + 1 + 2);
    }

    #[test]
    fn track_loss_ignores_ordering() {
        let people = vec![
            Person::new(Some(AgeGroup::Elder), Some(Role::Retired), []),
            Person::new(Some(AgeGroup::Adult), Some(Role::Criminal), [Flag::Guilty]),
            Person::new(Some(AgeGroup::Teen), None, [Flag::Friend]),
        ];
        let forward = Roster::new(people.clone());
        let reversed: Roster = people.into_iter().rev().collect();
        let table = WeightTable::default();

        assert_eq!(track_loss(&forward, &table), track_loss(&reversed, &table));
        assert_eq!(track_loss(&forward, &table), 2 + (2 - 1 - 2) + (3 + 1 + 1));
    }

    #[test]
    fn empty_track_has_zero_loss() {
        assert_eq!(track_loss(&Roster::default(), &WeightTable::default()), 0);
    }

    #[test]
    fn merged_table_changes_track_loss() {
        let track = Roster::new(vec![Person::new(None, Some(Role::Thief), [Flag::Guilty])]);
        let overrides = WeightOverrides {
            flag: crate::dilemma::weights::FlagOverrides {
                guilty: Some(-5),
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = WeightTable::default().merged(Some(&overrides));

        assert_eq!(track_loss(&track, &WeightTable::default()), 1 + 0 - 2);
        assert_eq!(track_loss(&track, &merged), 1 + 0 - 5);
    }
}
