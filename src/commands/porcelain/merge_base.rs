use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::merge::bca_finder::BCAFinder;
use std::io::Write;

impl Repository {
    pub fn merge_base(&self, first: &str, second: &str) -> anyhow::Result<()> {
        let first_oid = Revision::try_parse(first)?.resolve(self)?;
        let second_oid = Revision::try_parse(second)?.resolve(self)?;

        let database = self.database();
        let finder = BCAFinder::new(|oid| database.load_slim_commit(oid));
        let base_oid = finder
            .find_best_common_ancestor(&first_oid, &second_oid)?
            .ok_or_else(|| anyhow::anyhow!("no common ancestor between {first} and {second}"))?;

        writeln!(self.writer(), "{base_oid}")?;

        Ok(())
    }
}
